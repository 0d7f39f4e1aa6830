//! Camera CRUD and search.

use super::*;

impl RemoteClient {
    pub async fn create_camera(&self, camera: &Camera) -> Result<Camera> {
        self.post(
            Call::new(EntityKind::Camera, "create camera"),
            "dxpm/cameras",
            camera,
        )
        .await
    }

    pub async fn read_camera(&self, camera_id: &str) -> Result<Camera> {
        self.get(
            Call::new(EntityKind::Camera, "read camera").on(camera_id),
            &format!("dxpm/cameras/{}", camera_id),
        )
        .await
    }

    pub async fn update_camera(&self, camera: &Camera) -> Result<Camera> {
        let id = require_id(camera.id.as_deref(), EntityKind::Camera, "update")?;
        self.put(
            Call::new(EntityKind::Camera, "update camera").on(id),
            &format!("dxpm/cameras/{}", id),
            camera,
        )
        .await
    }

    pub async fn search_cameras(&self, filter: &SearchFilter) -> Result<Vec<Camera>> {
        let list: CameraList = self
            .post(
                Call::new(EntityKind::Camera, "search cameras"),
                "dxpm/cameras/search",
                filter,
            )
            .await?;
        Ok(list.cameras)
    }
}

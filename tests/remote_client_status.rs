mod common;

use anyhow::Result;

use insight_sync::remote::{
    Annotation, AnnotationParameters, Camera, FlightPlan, Mission, Project, RemoteClient,
    SearchFilter, Session,
};
use insight_sync::{EntityKind, PersistenceError};

async fn logged_in_client(guard: &common::ServerGuard) -> Result<RemoteClient> {
    let session = Session::new(&guard.config())?;
    assert!(session.login().await);
    Ok(RemoteClient::new(&guard.config(), session))
}

fn project(name: &str) -> Project {
    Project {
        name: name.to_string(),
        ..Project::default()
    }
}

#[tokio::test]
async fn calls_without_session_never_reach_the_network() -> Result<()> {
    let guard = common::spawn_stub().await?;
    let client = RemoteClient::new(&guard.config(), Session::new(&guard.config())?);

    let err = client.create_project(&project("Farm")).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(guard.calls().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn statuses_map_to_typed_failures() -> Result<()> {
    let guard = common::spawn_stub().await?;
    let client = logged_in_client(&guard).await?;

    guard
        .inject_fault("POST", "/uisrv/projects/search", 403, 1)
        .await?;
    let err = client.search_projects(&SearchFilter::all()).await.unwrap_err();
    assert!(matches!(err, PersistenceError::InsufficientRights));

    guard
        .inject_fault("POST", "/uisrv/projects/search", 401, 1)
        .await?;
    let err = client.search_projects(&SearchFilter::all()).await.unwrap_err();
    assert!(err.is_unauthorized());

    guard
        .inject_fault("POST", "/uisrv/projects/search", 500, 1)
        .await?;
    let err = client.search_projects(&SearchFilter::all()).await.unwrap_err();
    assert_eq!(err.status_code(), Some(500));

    let err = client.read_project("000000000000000000000000").await.unwrap_err();
    assert!(matches!(err, PersistenceError::Status { code: 404 }));

    // Faults are consumed; the service answers normally again.
    assert!(client.search_projects(&SearchFilter::all()).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn stale_version_is_reported_as_outdated() -> Result<()> {
    let guard = common::spawn_stub().await?;
    let client = logged_in_client(&guard).await?;

    let created = client.create_project(&project("Farm")).await?;
    assert_eq!(created.v, Some(0));

    let updated = client.update_project(&created).await?;
    assert_eq!(updated.v, Some(1));

    match client.update_project(&created).await.unwrap_err() {
        PersistenceError::Outdated { kind, remote_id } => {
            assert_eq!(kind, EntityKind::Project);
            assert_eq!(Some(remote_id), created.id);
        }
        other => panic!("unexpected {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn malformed_body_is_invalid_format() -> Result<()> {
    let guard = common::spawn_stub().await?;
    let client = logged_in_client(&guard).await?;

    let orphan = FlightPlan {
        name: "grid".to_string(),
        ..FlightPlan::default()
    };
    let err = client.create_flight_plan(&orphan).await.unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidFormat(_)));
    Ok(())
}

#[tokio::test]
async fn annotation_left_unconfigured_can_be_finished_alone() -> Result<()> {
    let guard = common::spawn_stub().await?;
    let client = logged_in_client(&guard).await?;

    let project = client.create_project(&project("Farm")).await?;
    let project_id = project.id.clone().unwrap();
    let mission = client
        .create_mission(
            &project_id,
            &Mission {
                name: "Flight 1".to_string(),
                ..Mission::default()
            },
        )
        .await?;
    assert_eq!(mission.project.as_deref(), Some(project_id.as_str()));

    let parameters = AnnotationParameters {
        name: "north field".to_string(),
        gsd: 2.5,
        ..AnnotationParameters::default()
    };
    let annotation = Annotation {
        project_id: Some(project_id.clone()),
        mission_id: mission.id.clone(),
        parameters: Some(parameters.clone()),
        ..Annotation::default()
    };

    guard
        .inject_fault("PUT", "/uisrv/annotations/", 500, 1)
        .await?;
    let remote_id = match client.create_annotation(&annotation).await.unwrap_err() {
        PersistenceError::PartiallyCreated {
            kind,
            remote_id,
            version,
            source,
        } => {
            assert_eq!(kind, EntityKind::Annotation);
            assert_eq!(version, Some(0));
            assert_eq!(source.status_code(), Some(500));
            remote_id
        }
        other => panic!("unexpected {other:?}"),
    };

    // The bare annotation exists; configure it without creating another.
    let shell = client.read_annotation(&remote_id).await?;
    assert_eq!(shell.parameters, None);
    let configured = client
        .attach_annotation_parameters(&remote_id, shell.v, &parameters)
        .await?;
    assert_eq!(configured.parameters, Some(parameters));
    assert_eq!(configured.v, Some(1));

    let found = client
        .search_annotations(&SearchFilter::by_mission(
            &project_id,
            mission.id.as_deref().unwrap(),
        ))
        .await?;
    assert_eq!(found.len(), 1);
    Ok(())
}

#[tokio::test]
async fn last_changes_reports_modification_date() -> Result<()> {
    let guard = common::spawn_stub().await?;
    let client = logged_in_client(&guard).await?;

    let created = client
        .create_project(&Project {
            modification_date: Some("2024-05-01T10:00:00Z".to_string()),
            ..project("Farm")
        })
        .await?;
    let id = created.id.unwrap();
    let changes = client.project_last_changes(&id).await?;
    assert_eq!(changes.id, id);
    assert_eq!(
        changes.modification_date.as_deref(),
        Some("2024-05-01T10:00:00Z")
    );
    Ok(())
}

#[tokio::test]
async fn camera_round_trip() -> Result<()> {
    let guard = common::spawn_stub().await?;
    let client = logged_in_client(&guard).await?;
    let farm = client.create_project(&project("Farm")).await?;
    let orchard = client.create_project(&project("Orchard")).await?;
    let farm_id = farm.id.clone().unwrap();

    let created = client
        .create_camera(&Camera {
            project_id: Some(farm_id.clone()),
            model: "FC6310".to_string(),
            focal_length: Some(8.8),
            width: Some(5472),
            height: Some(3648),
            ..Camera::default()
        })
        .await?;
    let camera_id = created.id.clone().unwrap();
    assert_eq!(created.v, Some(0));

    let read = client.read_camera(&camera_id).await?;
    assert_eq!(read, created);

    let updated = client
        .update_camera(&Camera {
            aspect_ratio: Some(1.5),
            ..read.clone()
        })
        .await?;
    assert_eq!(updated.v, Some(1));
    assert_eq!(updated.aspect_ratio, Some(1.5));
    assert_eq!(updated.model, "FC6310");

    // The read copy is now one version behind.
    let err = client.update_camera(&read).await.unwrap_err();
    assert!(matches!(
        err,
        PersistenceError::Outdated {
            kind: EntityKind::Camera,
            ..
        }
    ));

    let found = client.search_cameras(&SearchFilter::by_project(&farm_id)).await?;
    assert_eq!(found, vec![updated]);
    let none = client
        .search_cameras(&SearchFilter::by_project(orchard.id.as_deref().unwrap()))
        .await?;
    assert!(none.is_empty());
    Ok(())
}

//! Annotation (goal / area of interest) operations.
//!
//! An annotation is created in two physical steps: the bare annotation, then
//! its parameter sub-object. The annotation returned by
//! [`RemoteClient::create_annotation_shell`] is the "created but not
//! configured" state; [`RemoteClient::attach_annotation_parameters`] can be
//! retried on it alone.

use tracing::warn;

use super::*;

impl RemoteClient {
    pub async fn create_annotation_shell(&self, annotation: &Annotation) -> Result<Annotation> {
        let created: AnnotationEnvelope = self
            .post(
                Call::new(EntityKind::Annotation, "create annotation"),
                "uisrv/annotations",
                annotation,
            )
            .await?;
        Ok(created.annotation)
    }

    pub async fn attach_annotation_parameters(
        &self,
        annotation_id: &str,
        version: Option<u64>,
        parameters: &AnnotationParameters,
    ) -> Result<Annotation> {
        let updated: AnnotationEnvelope = self
            .put(
                Call::new(EntityKind::Annotation, "update annotation parameters").on(annotation_id),
                &format!("uisrv/annotations/{}/parameters", annotation_id),
                &AnnotationParametersRequest {
                    v: version,
                    parameters,
                },
            )
            .await?;
        Ok(updated.annotation)
    }

    pub async fn update_annotation_feature(
        &self,
        annotation_id: &str,
        version: Option<u64>,
        feature: &Feature,
    ) -> Result<Annotation> {
        let updated: AnnotationEnvelope = self
            .put(
                Call::new(EntityKind::Annotation, "update annotation feature").on(annotation_id),
                &format!("uisrv/annotations/{}/feature", annotation_id),
                &AnnotationFeatureRequest {
                    v: version,
                    feature,
                },
            )
            .await?;
        Ok(updated.annotation)
    }

    /// Creates the annotation and attaches its parameters.
    ///
    /// Succeeds only if both steps do. When the second step fails the remote
    /// annotation still exists and is reported through
    /// [`PersistenceError::PartiallyCreated`].
    pub async fn create_annotation(&self, annotation: &Annotation) -> Result<Annotation> {
        let shell = self.create_annotation_shell(annotation).await?;
        let id = require_id(shell.id.as_deref(), EntityKind::Annotation, "configure")?;
        let parameters = annotation.parameters.clone().unwrap_or_default();

        match self
            .attach_annotation_parameters(id, shell.v, &parameters)
            .await
        {
            Ok(configured) => Ok(configured),
            Err(source) => {
                warn!(remote_id = id, error = %source, "annotation created but not configured");
                Err(PersistenceError::PartiallyCreated {
                    kind: EntityKind::Annotation,
                    remote_id: id.to_string(),
                    version: shell.v,
                    source: Box::new(source),
                })
            }
        }
    }

    /// Pushes parameters, then the feature geometry, chaining the version
    /// returned by the first call into the second.
    pub async fn update_annotation(&self, annotation: &Annotation) -> Result<Annotation> {
        let id = require_id(annotation.id.as_deref(), EntityKind::Annotation, "update")?;
        let parameters = annotation.parameters.clone().unwrap_or_default();

        let updated = self
            .attach_annotation_parameters(id, annotation.v, &parameters)
            .await?;
        match &annotation.feature {
            Some(feature) => self.update_annotation_feature(id, updated.v, feature).await,
            None => Ok(updated),
        }
    }

    pub async fn read_annotation(&self, annotation_id: &str) -> Result<Annotation> {
        let found: AnnotationEnvelope = self
            .get(
                Call::new(EntityKind::Annotation, "read annotation").on(annotation_id),
                &format!("uisrv/annotations/{}", annotation_id),
            )
            .await?;
        Ok(found.annotation)
    }

    pub async fn search_annotations(&self, filter: &SearchFilter) -> Result<Vec<Annotation>> {
        let list: AnnotationList = self
            .post(
                Call::new(EntityKind::Annotation, "search annotations"),
                "uisrv/annotations/search",
                filter,
            )
            .await?;
        Ok(list.annotations)
    }
}

//! Annotations are created bare; parameters and feature are sub-resources.

use super::*;

fn envelope(annotation: Value) -> Json<Value> {
    Json(json!({ "annotation": annotation }))
}

pub(super) async fn create_annotation(
    State(state): State<Arc<AppState>>,
    Json(mut body): Json<Value>,
) -> Result<Json<Value>, DbError> {
    if let Some(obj) = body.as_object_mut() {
        obj.remove("parameters");
    }
    let mut db = state.db.write().await;
    require_parent(&db, &body)?;
    Ok(envelope(db.insert(Kind::Annotation, body)?))
}

pub(super) async fn get_annotation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, DbError> {
    Ok(envelope(state.db.read().await.get(Kind::Annotation, &id)?))
}

pub(super) async fn update_annotation_parameters(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, DbError> {
    let patch = sub_resource(body, "parameters")?;
    Ok(envelope(
        state.db.write().await.update(Kind::Annotation, &id, patch)?,
    ))
}

pub(super) async fn update_annotation_feature(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, DbError> {
    let patch = sub_resource(body, "feature")?;
    Ok(envelope(
        state.db.write().await.update(Kind::Annotation, &id, patch)?,
    ))
}

pub(super) async fn search_annotations(
    State(state): State<Arc<AppState>>,
    Json(filter): Json<Filter>,
) -> Json<Value> {
    let annotations = state.db.read().await.search(Kind::Annotation, &filter);
    Json(json!({ "annotations": annotations }))
}

/// Keeps only `field` and the optional `__v` of a sub-resource body.
fn sub_resource(body: Value, field: &str) -> Result<Value, DbError> {
    let value = body
        .get(field)
        .cloned()
        .ok_or_else(|| DbError::Invalid(format!("{} required", field)))?;
    let mut patch = json!({ field: value });
    if let Some(v) = body.get("__v") {
        patch["__v"] = v.clone();
    }
    Ok(patch)
}

/// Children must name an existing project and mission.
pub(super) fn require_parent(db: &Db, body: &Value) -> Result<(), DbError> {
    let project = body.get("project_id").and_then(Value::as_str);
    let mission = body.get("mission_id").and_then(Value::as_str);
    match (project, mission) {
        (Some(p), Some(m)) => {
            db.get(Kind::Project, p)?;
            db.get(Kind::Mission, m)?;
            Ok(())
        }
        _ => Err(DbError::Invalid(
            "project_id and mission_id required".to_string(),
        )),
    }
}

use super::*;

pub(super) async fn create_mission(
    State(state): State<Arc<AppState>>,
    Json(mut body): Json<Value>,
) -> Result<Json<Value>, DbError> {
    // Create bodies reference the project as `{"_id": ...}`; store the bare id.
    let project_id = body
        .pointer("/project/_id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| DbError::Invalid("project._id required".to_string()))?;

    let mut db = state.db.write().await;
    db.get(Kind::Project, &project_id)?;
    body["project"] = Value::String(project_id);
    Ok(Json(db.insert(Kind::Mission, body)?))
}

pub(super) async fn get_mission(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, DbError> {
    Ok(Json(state.db.read().await.get(Kind::Mission, &id)?))
}

pub(super) async fn update_mission(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, DbError> {
    Ok(Json(state.db.write().await.update(Kind::Mission, &id, body)?))
}

pub(super) async fn search_missions(
    State(state): State<Arc<AppState>>,
    Json(filter): Json<Filter>,
) -> Json<Value> {
    let missions = state.db.read().await.search(Kind::Mission, &filter);
    Json(json!({ "missions": missions }))
}

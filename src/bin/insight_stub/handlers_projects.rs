use super::*;

pub(super) async fn search_projects(
    State(state): State<Arc<AppState>>,
    Json(filter): Json<Filter>,
) -> Json<Value> {
    let projects = state.db.read().await.search(Kind::Project, &filter);
    Json(json!({ "projects": projects }))
}

pub(super) async fn create_project(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, DbError> {
    let project = state.db.write().await.insert(Kind::Project, body)?;
    Ok(Json(json!({ "project": project })))
}

pub(super) async fn get_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, DbError> {
    Ok(Json(state.db.read().await.get(Kind::Project, &id)?))
}

pub(super) async fn update_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, DbError> {
    Ok(Json(state.db.write().await.update(Kind::Project, &id, body)?))
}

pub(super) async fn delete_project(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, DbError> {
    Ok(Json(state.db.write().await.remove_project(&id)?))
}

pub(super) async fn project_last_changes(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, DbError> {
    let project = state.db.read().await.get(Kind::Project, &id)?;
    Ok(Json(json!({
        "_id": id,
        "modification_date": project.get("modification_date").cloned().unwrap_or(Value::Null),
    })))
}

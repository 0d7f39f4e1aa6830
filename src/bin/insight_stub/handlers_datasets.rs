//! Flight plans, flights and cameras.

use super::*;

fn flight_plan_envelope(flight_plan: Value) -> Json<Value> {
    Json(json!({ "flight_plan": flight_plan }))
}

pub(super) async fn create_flight_plan(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, DbError> {
    let mut db = state.db.write().await;
    require_parent(&db, &body)?;
    Ok(flight_plan_envelope(db.insert(Kind::FlightPlan, body)?))
}

pub(super) async fn get_flight_plan(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, DbError> {
    Ok(flight_plan_envelope(
        state.db.read().await.get(Kind::FlightPlan, &id)?,
    ))
}

pub(super) async fn update_flight_plan(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, DbError> {
    Ok(flight_plan_envelope(
        state.db.write().await.update(Kind::FlightPlan, &id, body)?,
    ))
}

pub(super) async fn search_flight_plans(
    State(state): State<Arc<AppState>>,
    Json(filter): Json<Filter>,
) -> Json<Value> {
    let flight_plans = state.db.read().await.search(Kind::FlightPlan, &filter);
    Json(json!({ "flight_plans": flight_plans }))
}

pub(super) async fn create_flight(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, DbError> {
    let mut db = state.db.write().await;
    let project = body
        .get("project")
        .and_then(Value::as_str)
        .ok_or_else(|| DbError::Invalid("project required".to_string()))?;
    db.get(Kind::Project, project)?;
    Ok(Json(db.insert(Kind::Flight, body)?))
}

pub(super) async fn get_flight(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, DbError> {
    Ok(Json(state.db.read().await.get(Kind::Flight, &id)?))
}

pub(super) async fn update_flight(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, DbError> {
    Ok(Json(state.db.write().await.update(Kind::Flight, &id, body)?))
}

pub(super) async fn search_flights(
    State(state): State<Arc<AppState>>,
    Json(filter): Json<Filter>,
) -> Json<Value> {
    let flights = state.db.read().await.search(Kind::Flight, &filter);
    Json(json!({ "flights": flights }))
}

pub(super) async fn create_camera(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, DbError> {
    Ok(Json(state.db.write().await.insert(Kind::Camera, body)?))
}

pub(super) async fn get_camera(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, DbError> {
    Ok(Json(state.db.read().await.get(Kind::Camera, &id)?))
}

pub(super) async fn update_camera(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, DbError> {
    Ok(Json(state.db.write().await.update(Kind::Camera, &id, body)?))
}

pub(super) async fn search_cameras(
    State(state): State<Arc<AppState>>,
    Json(filter): Json<Filter>,
) -> Json<Value> {
    let cameras = state.db.read().await.search(Kind::Camera, &filter);
    Json(json!({ "cameras": cameras }))
}

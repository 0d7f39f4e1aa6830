//! API route registration. Everything here is call-logged and fault-injectable;
//! everything but the token exchange needs a bearer token.

use super::*;

pub(super) fn api_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let authed = Router::new()
        .route("/uisrv/projects", post(create_project))
        .route("/uisrv/projects/search", post(search_projects))
        .route(
            "/dxpm/projects/:id",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/dxpm/projects/:id/last-changes", post(project_last_changes))
        .route("/dxpm/missions", post(create_mission))
        .route("/dxpm/missions/search", post(search_missions))
        .route("/dxpm/missions/:id", get(get_mission).put(update_mission))
        .route("/uisrv/annotations", post(create_annotation))
        .route("/uisrv/annotations/search", post(search_annotations))
        .route("/uisrv/annotations/:id", get(get_annotation))
        .route(
            "/uisrv/annotations/:id/parameters",
            put(update_annotation_parameters),
        )
        .route("/uisrv/annotations/:id/feature", put(update_annotation_feature))
        .route("/uisrv/flight-plan", post(create_flight_plan))
        .route("/uisrv/flight-plan/search", post(search_flight_plans))
        .route(
            "/uisrv/flight-plan/:id",
            get(get_flight_plan).put(update_flight_plan),
        )
        .route("/dxpm/flights", post(create_flight))
        .route("/dxpm/flights/search", post(search_flights))
        .route("/dxpm/flights/:id", get(get_flight).put(update_flight))
        .route("/dxpm/cameras", post(create_camera))
        .route("/dxpm/cameras/search", post(search_cameras))
        .route("/dxpm/cameras/:id", get(get_camera).put(update_camera))
        .layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    Router::new()
        .route("/dxauth/oauth2/token", post(issue_token))
        .merge(authed)
        .layer(middleware::from_fn_with_state(state, record_and_inject))
}

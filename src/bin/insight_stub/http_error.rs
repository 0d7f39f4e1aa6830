use super::*;

pub(super) fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": "unauthorized"})),
    )
        .into_response()
}

pub(super) fn bad_request(msg: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({"error": msg}))).into_response()
}

pub(super) fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"error": "not found"}))).into_response()
}

/// Stale `__v` on an update. Mirrors the service: a 400 with a marker code.
pub(super) fn version_conflict() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"error": "outdated", "code": "VERSION_CONFLICT"})),
    )
        .into_response()
}

pub(super) fn internal_error(err: anyhow::Error) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": err.to_string()})),
    )
        .into_response()
}

impl IntoResponse for DbError {
    fn into_response(self) -> Response {
        match self {
            DbError::NotFound => not_found(),
            DbError::Conflict => version_conflict(),
            DbError::Invalid(msg) => bad_request(&msg),
        }
    }
}

//! Call log and fault injection used by the integration tests.

use super::*;

#[derive(Clone, Debug, serde::Deserialize)]
pub(super) struct Fault {
    method: String,
    /// Prefix of the request path, e.g. `/dxpm/projects/`.
    path: String,
    /// Answer with this status instead of handling the request.
    #[serde(default)]
    status: Option<u16>,
    /// Stall the request this long before answering.
    #[serde(default)]
    delay_ms: u64,
    #[serde(default = "default_times")]
    times: u32,
}

fn default_times() -> u32 {
    1
}

pub(super) async fn list_calls(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.calls.read().await.clone())
}

pub(super) async fn clear_calls(State(state): State<Arc<AppState>>) -> StatusCode {
    state.calls.write().await.clear();
    StatusCode::NO_CONTENT
}

pub(super) async fn add_fault(
    State(state): State<Arc<AppState>>,
    Json(fault): Json<Fault>,
) -> Response {
    match fault.status {
        Some(status) if StatusCode::from_u16(status).is_err() => {
            return bad_request("invalid status");
        }
        None if fault.delay_ms == 0 => return bad_request("status or delay_ms required"),
        _ => {}
    }
    state.faults.write().await.push(fault);
    StatusCode::NO_CONTENT.into_response()
}

/// Logs every API call, then applies a matching fault if one is armed: the
/// request is delayed and/or answered with the fault's status.
pub(super) async fn record_and_inject(
    State(state): State<Arc<AppState>>,
    req: axum::extract::Request,
    next: Next,
) -> Response {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    state.calls.write().await.push(format!("{} {}", method, path));

    let injected = {
        let mut faults = state.faults.write().await;
        let hit = faults
            .iter()
            .position(|f| f.method.eq_ignore_ascii_case(&method) && path.starts_with(&f.path));
        hit.map(|idx| {
            let fault = &mut faults[idx];
            let armed = (fault.status, fault.delay_ms);
            fault.times = fault.times.saturating_sub(1);
            if fault.times == 0 {
                faults.remove(idx);
            }
            armed
        })
    };
    let Some((status, delay_ms)) = injected else {
        return next.run(req).await;
    };

    if delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
    match status.and_then(|s| StatusCode::from_u16(s).ok()) {
        Some(status) => (status, Json(json!({}))).into_response(),
        None => next.run(req).await,
    }
}

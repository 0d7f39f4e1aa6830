use anyhow::anyhow;

use super::*;

#[derive(Debug, serde::Deserialize)]
pub(super) struct TokenRequest {
    username: String,
    password: String,
}

pub(super) async fn issue_token(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TokenRequest>,
) -> Response {
    if !state.login_delay.is_zero() {
        tokio::time::sleep(state.login_delay).await;
    }
    if req.username != state.username || req.password != state.password {
        return unauthorized();
    }

    let token = match generate_token_secret() {
        Ok(t) => t,
        Err(err) => return internal_error(err),
    };
    state.tokens.write().await.insert(token.clone());
    info!(user = %req.username, "token issued");

    Json(json!({
        "access_token": token,
        "token_type": "bearer",
        "expires_in": 3600,
    }))
    .into_response()
}

pub(super) async fn require_bearer(
    State(state): State<Arc<AppState>>,
    req: axum::extract::Request,
    next: Next,
) -> Response {
    let Some(value) = req.headers().get(header::AUTHORIZATION) else {
        return unauthorized();
    };

    let Ok(value) = value.to_str() else {
        return unauthorized();
    };

    let Some(token) = value.strip_prefix("Bearer ") else {
        return unauthorized();
    };

    if !state.tokens.read().await.contains(token) {
        return unauthorized();
    }

    next.run(req).await
}

fn generate_token_secret() -> Result<String> {
    // 32 bytes of entropy, hex-encoded.
    let mut bytes = [0u8; 32];
    getrandom::getrandom(&mut bytes).map_err(|e| anyhow!("getrandom: {:?}", e))?;
    let mut out = String::with_capacity(64);
    for b in &bytes {
        out.push_str(&format!("{:02x}", b));
    }
    Ok(out)
}

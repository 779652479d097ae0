use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use stockline_core::SessionToken;

use crate::app::services::AppServices;
use crate::context::SessionContext;

#[derive(Clone)]
pub struct AuthState {
    pub services: Arc<AppServices>,
}

/// Resolve the bearer session token into a `SessionContext` extension, or
/// reject the request.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = extract_bearer(req.headers())?;

    let token: SessionToken = token.parse().map_err(|_| StatusCode::UNAUTHORIZED)?;
    let gate = state.services.gate();

    // Fast path: the token is live in this process. Otherwise ask the
    // provider to restore it (stored token surviving a restart).
    let profile = match gate.current_user(&token).await {
        Some(profile) => profile,
        None => match gate.restore(&token).await {
            Ok(Some(profile)) => profile,
            Ok(None) => return Err(StatusCode::UNAUTHORIZED),
            Err(_) => return Err(StatusCode::BAD_GATEWAY),
        },
    };

    req.extensions_mut()
        .insert(SessionContext::new(token, profile));

    Ok(next.run(req).await)
}

pub(crate) fn extract_bearer(headers: &HeaderMap) -> Result<&str, StatusCode> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let header = header.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(token)
}

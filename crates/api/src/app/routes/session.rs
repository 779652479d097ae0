use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};

use stockline_core::SessionToken;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::SessionContext;
use crate::middleware::extract_bearer;

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    match services.gate().authenticate(&body.username, &body.password).await {
        Ok(session) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "token": session.token.to_string(),
                "user": dto::profile_to_json(&session.profile),
            })),
        )
            .into_response(),
        Err(err) => errors::auth_error_to_response(err),
    }
}

/// Idempotent: a missing, malformed, or already-dead token still yields
/// 204 — there is nothing left to revoke.
pub async fn logout(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> axum::response::Response {
    let Ok(raw) = extract_bearer(&headers) else {
        return StatusCode::NO_CONTENT.into_response();
    };
    let Ok(token) = raw.parse::<SessionToken>() else {
        return StatusCode::NO_CONTENT.into_response();
    };

    match services.gate().logout(&token).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => errors::auth_error_to_response(err),
    }
}

pub async fn whoami(Extension(ctx): Extension<SessionContext>) -> impl IntoResponse {
    Json(dto::profile_to_json(ctx.profile()))
}

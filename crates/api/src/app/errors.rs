use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockline_auth::AuthError;
use stockline_core::DomainError;
use stockline_infra::{ServiceError, StoreError};

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Domain(DomainError::Validation(msg)) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        ServiceError::Domain(DomainError::InvalidId(msg)) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_id", msg)
        }
        ServiceError::Domain(DomainError::NotFound) | ServiceError::Store(StoreError::NotFound) => {
            json_error(StatusCode::NOT_FOUND, "not_found", "not found")
        }
        ServiceError::Store(StoreError::Duplicate(id)) => json_error(
            StatusCode::CONFLICT,
            "conflict",
            format!("item id already exists: {id}"),
        ),
        ServiceError::Store(StoreError::Unavailable(msg)) => {
            json_error(StatusCode::BAD_GATEWAY, "backend_unavailable", msg)
        }
    }
}

pub fn auth_error_to_response(err: AuthError) -> axum::response::Response {
    match err {
        // One collapsed failure: no hint about which sub-cause occurred.
        AuthError::Failed => json_error(StatusCode::UNAUTHORIZED, "auth_failed", "authentication failed"),
        AuthError::Unavailable(msg) => {
            json_error(StatusCode::BAD_GATEWAY, "backend_unavailable", msg)
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

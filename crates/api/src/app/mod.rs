//! HTTP API application wiring (Axum router + service wiring).
//!
//! Structure:
//! - `services.rs`: backend wiring (stores, provider, inventory service, gate)
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, routing::post, Extension, Router};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app() -> Router {
    build_app_with(Arc::new(services::build_services().await))
}

/// Build the router over pre-built services (tests inject their own wiring).
pub fn build_app_with(services: Arc<services::AppServices>) -> Router {
    let auth_state = middleware::AuthState {
        services: services.clone(),
    };

    // Login and logout are reachable without an established session: login
    // creates one, and logout of an already-dead token must stay idempotent
    // rather than bounce off the auth middleware.
    let public = Router::new()
        .route("/health", get(routes::system::health))
        .route("/session/login", post(routes::session::login))
        .route("/session/logout", post(routes::session::logout))
        .layer(Extension(services.clone()));

    let protected = routes::router().layer(
        ServiceBuilder::new()
            .layer(Extension(services))
            .layer(axum::middleware::from_fn_with_state(
                auth_state,
                middleware::auth_middleware,
            )),
    );

    Router::new().merge(public).merge(protected)
}

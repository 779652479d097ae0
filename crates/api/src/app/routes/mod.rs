use axum::{
    routing::{get, post, put},
    Router,
};

pub mod items;
pub mod session;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(session::whoami))
        .route("/items", get(items::list_items).post(items::create_item))
        .route("/items/stats", get(items::location_stats))
        .route("/items/:id", get(items::get_item))
        .route("/items/:id/stock", put(items::set_stock))
        .route("/items/:id/adjust", post(items::adjust_stock))
}

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use stockline_inventory::ItemId;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::SessionContext;

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SessionContext>,
    Query(query): Query<dto::ListItemsQuery>,
) -> axum::response::Response {
    let location = match query.location() {
        Ok(location) => location,
        Err(err) => return errors::service_error_to_response(err.into()),
    };
    let filter = match query.filter() {
        Ok(filter) => filter,
        Err(err) => return errors::service_error_to_response(err.into()),
    };

    match services.inventory().list_items(location, &filter).await {
        Ok(items) => {
            let show_pricing = ctx.can_view_pricing();
            let items: Vec<_> = items
                .iter()
                .map(|item| dto::item_to_json(item, show_pricing))
                .collect();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(err) => errors::service_error_to_response(err),
    }
}

pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SessionContext>,
    Json(body): Json<dto::CreateItemRequest>,
) -> axum::response::Response {
    let draft = match body.into_draft() {
        Ok(draft) => draft,
        Err(err) => return errors::service_error_to_response(err.into()),
    };

    match services.inventory().add_item(draft).await {
        Ok(item) => (
            StatusCode::CREATED,
            Json(dto::item_to_json(&item, ctx.can_view_pricing())),
        )
            .into_response(),
        Err(err) => errors::service_error_to_response(err),
    }
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match ItemId::parse(&id) {
        Ok(id) => id,
        Err(err) => return errors::service_error_to_response(err.into()),
    };

    match services.inventory().get_item(&id).await {
        Ok(item) => (
            StatusCode::OK,
            Json(dto::item_to_json(&item, ctx.can_view_pricing())),
        )
            .into_response(),
        Err(err) => errors::service_error_to_response(err),
    }
}

/// Absolute stock replacement (`update_quantity`).
pub async fn set_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::SetStockRequest>,
) -> axum::response::Response {
    let id = match ItemId::parse(&id) {
        Ok(id) => id,
        Err(err) => return errors::service_error_to_response(err.into()),
    };

    match services.inventory().update_quantity(&id, body.stock).await {
        Ok(item) => (
            StatusCode::OK,
            Json(dto::item_to_json(&item, ctx.can_view_pricing())),
        )
            .into_response(),
        Err(err) => errors::service_error_to_response(err),
    }
}

/// Relative adjustment: add or remove, clamped at zero.
pub async fn adjust_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::AdjustStockRequest>,
) -> axum::response::Response {
    let id = match ItemId::parse(&id) {
        Ok(id) => id,
        Err(err) => return errors::service_error_to_response(err.into()),
    };
    let adjustment = match body.into_adjustment() {
        Ok(adjustment) => adjustment,
        Err(err) => return errors::service_error_to_response(err.into()),
    };

    match services.inventory().adjust_quantity(&id, adjustment).await {
        Ok(item) => (
            StatusCode::OK,
            Json(dto::item_to_json(&item, ctx.can_view_pricing())),
        )
            .into_response(),
        Err(err) => errors::service_error_to_response(err),
    }
}

pub async fn location_stats(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<SessionContext>,
    Query(query): Query<dto::StatsQuery>,
) -> axum::response::Response {
    let location = match query.location.parse::<stockline_inventory::Location>() {
        Ok(location) => location,
        Err(err) => return errors::service_error_to_response(err.into()),
    };

    match services.inventory().location_stats(location).await {
        Ok(stats) => (
            StatusCode::OK,
            Json(dto::stats_to_json(&stats, ctx.can_view_pricing())),
        )
            .into_response(),
        Err(err) => errors::service_error_to_response(err),
    }
}

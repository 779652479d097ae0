use serde::Deserialize;

use stockline_auth::UserProfile;
use stockline_core::{DomainError, DomainResult};
use stockline_inventory::{
    AdjustOp, Category, CategoryFilter, Classification, InventoryItem, ItemDraft, ItemFilter,
    ItemStatus, Location, LocationStats, MaterialType, StockAdjustment,
};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Create-item payload. Field names follow the backing table columns; enum
/// fields arrive as wire strings and are parsed into the closed enums before
/// anything reaches the store.
#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub item_name: String,
    pub category: String,
    #[serde(rename = "type")]
    pub material_type: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub stock: u32,
    pub status: String,
    #[serde(default)]
    pub note: String,
    pub location: String,
}

impl CreateItemRequest {
    pub fn into_draft(self) -> DomainResult<ItemDraft> {
        let category: Category = self.category.parse()?;
        let material_type = self
            .material_type
            .map(|t| t.parse::<MaterialType>())
            .transpose()?;

        Ok(ItemDraft {
            name: self.item_name,
            classification: Classification::new(category, material_type)?,
            price: self.price,
            stock: self.stock,
            status: self.status.parse::<ItemStatus>()?,
            note: self.note,
            location: self.location.parse::<Location>()?,
        })
    }
}

/// Absolute stock replacement (the caller pre-computes and pre-clamps).
#[derive(Debug, Deserialize)]
pub struct SetStockRequest {
    pub stock: u32,
}

/// Relative adjustment: quick (±1, ±10) or custom amount, same formulas.
#[derive(Debug, Deserialize)]
pub struct AdjustStockRequest {
    pub op: String,
    pub amount: u32,
}

impl AdjustStockRequest {
    pub fn into_adjustment(self) -> DomainResult<StockAdjustment> {
        let op = match self.op.as_str() {
            "add" => AdjustOp::Add,
            "remove" => AdjustOp::Remove,
            other => {
                return Err(DomainError::validation(format!(
                    "op must be one of: add, remove (got '{other}')"
                )));
            }
        };
        StockAdjustment::new(op, self.amount)
    }
}

#[derive(Debug, Deserialize)]
pub struct ListItemsQuery {
    pub location: String,
    pub search: Option<String>,
    pub category: Option<String>,
}

impl ListItemsQuery {
    pub fn location(&self) -> DomainResult<Location> {
        self.location.parse()
    }

    pub fn filter(&self) -> DomainResult<ItemFilter> {
        let category = match self.category.as_deref() {
            None | Some("all") => CategoryFilter::All,
            Some(raw) => CategoryFilter::One(raw.parse::<Category>()?),
        };
        Ok(ItemFilter {
            search: self.search.clone().unwrap_or_default(),
            category,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub location: String,
}

// -------------------------
// JSON mapping helpers
// -------------------------

/// Shape one item for the wire. `price` is rendered only when the caller's
/// role may view pricing.
pub fn item_to_json(item: &InventoryItem, show_pricing: bool) -> serde_json::Value {
    let mut value = serde_json::json!({
        "id": item.id.as_str(),
        "item_name": item.name,
        "category": item.category().as_str(),
        "type": item.classification.material_type().map(|t| t.as_str()),
        "stock": item.stock,
        "status": item.status.as_str(),
        "note": item.note,
        "location": item.location.as_str(),
        "created_at": item.created_at.to_rfc3339(),
        "updated_at": item.updated_at.to_rfc3339(),
    });
    if show_pricing {
        value["price"] = serde_json::json!(item.price);
    }
    value
}

pub fn profile_to_json(profile: &UserProfile) -> serde_json::Value {
    serde_json::json!({
        "id": profile.id.to_string(),
        "username": profile.username,
        "role": profile.role.as_str(),
        "name": profile.name,
    })
}

/// `total_value` is an aggregate monetary figure: owners only.
pub fn stats_to_json(stats: &LocationStats, show_pricing: bool) -> serde_json::Value {
    let mut value = serde_json::json!({
        "total_items": stats.total_items,
        "low_stock": stats.low_stock,
        "out_of_stock": stats.out_of_stock,
    });
    if show_pricing {
        value["total_value"] = serde_json::json!(stats.total_value);
    }
    value
}

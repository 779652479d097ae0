//! List filtering and per-location statistics.
//!
//! All functions here are pure: the store hands over one location partition
//! and these shape it for display.

use serde::{Deserialize, Serialize};

use crate::item::{Category, InventoryItem};

/// Stock level at or below which an item counts as "low stock".
pub const LOW_STOCK_THRESHOLD: u32 = 50;

/// Category predicate for list queries.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    One(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::One(c) => *c == category,
        }
    }
}

/// Combined list filter: free-text search plus category.
///
/// The search term matches case-insensitively as a substring of the item
/// name or its id; an empty term matches everything.
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    pub search: String,
    pub category: CategoryFilter,
}

impl ItemFilter {
    pub fn matches(&self, item: &InventoryItem) -> bool {
        if !self.category.matches(item.category()) {
            return false;
        }
        let term = self.search.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        item.name.to_lowercase().contains(&term)
            || item.id.as_str().to_lowercase().contains(&term)
    }

    /// Filter one location partition and order it most-recently-created
    /// first. Ties keep their relative order, so output is deterministic for
    /// a fixed input set.
    pub fn apply(&self, mut items: Vec<InventoryItem>) -> Vec<InventoryItem> {
        items.retain(|item| self.matches(item));
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        items
    }
}

/// Aggregate numbers for one location partition.
///
/// `total_value` is pricing-bearing; the presentation layer renders it only
/// for roles that may view pricing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationStats {
    pub total_items: usize,
    pub low_stock: usize,
    pub out_of_stock: usize,
    pub total_value: f64,
}

impl LocationStats {
    pub fn compute(items: &[InventoryItem]) -> Self {
        Self {
            total_items: items.len(),
            low_stock: items.iter().filter(|i| i.stock <= LOW_STOCK_THRESHOLD).count(),
            out_of_stock: items.iter().filter(|i| i.stock == 0).count(),
            total_value: items.iter().map(InventoryItem::value).sum(),
        }
    }
}

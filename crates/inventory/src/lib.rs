//! Inventory domain module.
//!
//! This crate contains business rules for stock-keeping records, implemented
//! purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod adjust;
pub mod item;
pub mod query;

pub use adjust::{AdjustOp, StockAdjustment, QUICK_ADJUST_AMOUNTS};
pub use item::{
    Category, Classification, InventoryItem, ItemDraft, ItemId, ItemStatus, Location, MaterialType,
};
pub use query::{CategoryFilter, ItemFilter, LocationStats, LOW_STOCK_THRESHOLD};

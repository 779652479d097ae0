//! Record-store contracts.
//!
//! The canonical inventory set and the user-profile registry live behind
//! these traits; the service and gate never talk to a concrete backend.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use stockline_auth::UserProfile;
use stockline_core::SubjectId;
use stockline_inventory::{Category, InventoryItem, ItemId, Location};

/// Backend failure as seen by the orchestration layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The referenced record does not exist.
    #[error("record not found")]
    NotFound,

    /// An insert collided with an existing primary key.
    #[error("duplicate item id: {0}")]
    Duplicate(ItemId),

    /// The backend is unreachable or returned a server error. Recoverable;
    /// retry policy belongs to the caller.
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// The authoritative collection of inventory records.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Append one record. Fails with `Duplicate` if the id already exists.
    async fn insert(&self, item: InventoryItem) -> Result<(), StoreError>;

    async fn get(&self, id: &ItemId) -> Result<InventoryItem, StoreError>;

    /// One location partition, most-recently-created first.
    async fn list_by_location(&self, location: Location) -> Result<Vec<InventoryItem>, StoreError>;

    /// Replace `stock` and refresh `updated_at`; every other field is left
    /// untouched. Returns the updated record.
    async fn set_stock(
        &self,
        id: &ItemId,
        stock: u32,
        updated_at: DateTime<Utc>,
    ) -> Result<InventoryItem, StoreError>;

    /// How many records of `category` exist, across both locations. Feeds
    /// item-id derivation.
    async fn count_by_category(&self, category: Category) -> Result<u64, StoreError>;
}

#[async_trait]
impl<S> ItemStore for Arc<S>
where
    S: ItemStore + ?Sized,
{
    async fn insert(&self, item: InventoryItem) -> Result<(), StoreError> {
        (**self).insert(item).await
    }

    async fn get(&self, id: &ItemId) -> Result<InventoryItem, StoreError> {
        (**self).get(id).await
    }

    async fn list_by_location(&self, location: Location) -> Result<Vec<InventoryItem>, StoreError> {
        (**self).list_by_location(location).await
    }

    async fn set_stock(
        &self,
        id: &ItemId,
        stock: u32,
        updated_at: DateTime<Utc>,
    ) -> Result<InventoryItem, StoreError> {
        (**self).set_stock(id, stock, updated_at).await
    }

    async fn count_by_category(&self, category: Category) -> Result<u64, StoreError> {
        (**self).count_by_category(category).await
    }
}

/// The user registry, keyed by the identity provider's subject id.
///
/// Profiles are provisioned by an external system; this side only reads.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn find_by_subject(&self, subject: SubjectId) -> Result<Option<UserProfile>, StoreError>;
}

#[async_trait]
impl<S> ProfileStore for Arc<S>
where
    S: ProfileStore + ?Sized,
{
    async fn find_by_subject(&self, subject: SubjectId) -> Result<Option<UserProfile>, StoreError> {
        (**self).find_by_subject(subject).await
    }
}

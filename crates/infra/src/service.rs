//! Inventory orchestration.
//!
//! `InventoryService` owns the mutation rules that span the store boundary:
//! validated creation with count-derived id assignment, absolute and relative
//! stock updates, and the filtered list/stats reads. It composes an
//! `ItemStore` and contains no backend code itself.

use chrono::Utc;
use thiserror::Error;
use tokio::sync::Mutex;

use stockline_core::DomainError;
use stockline_inventory::{
    InventoryItem, ItemDraft, ItemFilter, ItemId, Location, LocationStats, StockAdjustment,
};

use crate::store::{ItemStore, StoreError};

/// Failure of a service operation: a deterministic domain rejection or a
/// store-side fault.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The Inventory Store component: canonical mutation and read paths.
pub struct InventoryService<S> {
    store: S,
    // One lock per category: `add_item` must serialize the
    // count → derive id → insert sequence within a category, or two rapid
    // creates would compute the same sequence number. Creates in different
    // categories do not contend.
    category_locks: [Mutex<()>; 3],
}

impl<S: ItemStore> InventoryService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            category_locks: [Mutex::new(()), Mutex::new(()), Mutex::new(())],
        }
    }

    /// Create a record from a draft: validate, assign the next id for its
    /// category, stamp both timestamps, insert.
    pub async fn add_item(&self, draft: ItemDraft) -> Result<InventoryItem, ServiceError> {
        draft.validate()?;

        let category = draft.classification.category();
        let _serialized = self.category_locks[category.index()].lock().await;

        let count = self.store.count_by_category(category).await?;
        let item = draft.materialize(ItemId::derive(category, count), Utc::now());

        tracing::info!(id = %item.id, category = %category, location = %item.location, "adding inventory item");
        self.store.insert(item.clone()).await?;
        Ok(item)
    }

    /// Replace an item's stock with an absolute value.
    ///
    /// The only post-creation mutation (besides `updated_at`). Last write
    /// wins by commit order.
    pub async fn update_quantity(
        &self,
        id: &ItemId,
        new_stock: u32,
    ) -> Result<InventoryItem, ServiceError> {
        let item = self.store.set_stock(id, new_stock, Utc::now()).await?;
        tracing::info!(id = %item.id, stock = item.stock, "stock updated");
        Ok(item)
    }

    /// Apply a relative adjustment (quick or custom amount) to an item's
    /// current stock. Removal clamps at zero.
    pub async fn adjust_quantity(
        &self,
        id: &ItemId,
        adjustment: StockAdjustment,
    ) -> Result<InventoryItem, ServiceError> {
        let current = self.store.get(id).await?;
        let new_stock = adjustment.apply(current.stock);
        self.update_quantity(id, new_stock).await
    }

    pub async fn get_item(&self, id: &ItemId) -> Result<InventoryItem, ServiceError> {
        Ok(self.store.get(id).await?)
    }

    /// One location partition, filtered and ordered for display.
    pub async fn list_items(
        &self,
        location: Location,
        filter: &ItemFilter,
    ) -> Result<Vec<InventoryItem>, ServiceError> {
        let items = self.store.list_by_location(location).await?;
        Ok(filter.apply(items))
    }

    /// Aggregate numbers for one location partition (unfiltered).
    pub async fn location_stats(&self, location: Location) -> Result<LocationStats, ServiceError> {
        let items = self.store.list_by_location(location).await?;
        Ok(LocationStats::compute(&items))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use stockline_inventory::{
        Category, CategoryFilter, Classification, ItemStatus, MaterialType,
    };

    use super::*;
    use crate::memory::InMemoryItemStore;

    fn service() -> InventoryService<Arc<InMemoryItemStore>> {
        InventoryService::new(Arc::new(InMemoryItemStore::new()))
    }

    fn material_draft(name: &str, location: Location) -> ItemDraft {
        ItemDraft {
            name: name.to_string(),
            classification: Classification::Material(MaterialType::Virgin),
            price: 1.25,
            stock: 5000,
            status: ItemStatus::InStock,
            note: "High density polyethylene for bottles".to_string(),
            location,
        }
    }

    fn product_draft(name: &str, location: Location) -> ItemDraft {
        ItemDraft {
            name: name.to_string(),
            classification: Classification::Product,
            price: 0.15,
            stock: 10_000,
            status: ItemStatus::InStock,
            note: String::new(),
            location,
        }
    }

    #[tokio::test]
    async fn sequential_adds_produce_increasing_ids() {
        let svc = service();
        let first = svc
            .add_item(material_draft("HDPE Pellets", Location::LocationOne))
            .await
            .unwrap();
        let second = svc
            .add_item(material_draft("PET Flakes", Location::LocationTwo))
            .await
            .unwrap();
        assert_eq!(first.id.as_str(), "MAT001");
        assert_eq!(second.id.as_str(), "MAT002");
    }

    #[tokio::test]
    async fn categories_count_independently() {
        let svc = service();
        svc.add_item(material_draft("HDPE Pellets", Location::LocationOne))
            .await
            .unwrap();
        let product = svc
            .add_item(product_draft("Water Bottles 500ml", Location::LocationOne))
            .await
            .unwrap();
        assert_eq!(product.id.as_str(), "PRO001");
    }

    #[tokio::test]
    async fn add_item_rejects_invalid_drafts_before_the_store() {
        let svc = service();
        let mut bad = material_draft("", Location::LocationOne);
        bad.name = "  ".to_string();
        let err = svc.add_item(bad).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::Validation(_))));

        // Nothing was inserted.
        let listed = svc
            .list_items(Location::LocationOne, &ItemFilter::default())
            .await
            .unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn concurrent_same_category_adds_never_collide() {
        let svc = Arc::new(service());
        let mut handles = Vec::new();
        for n in 0..10 {
            let svc = svc.clone();
            handles.push(tokio::spawn(async move {
                svc.add_item(material_draft(&format!("Material {n}"), Location::LocationOne))
                    .await
                    .unwrap()
                    .id
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        ids.dedup();
        assert_eq!(ids.len(), 10);
        assert_eq!(ids.first().unwrap().as_str(), "MAT001");
        assert_eq!(ids.last().unwrap().as_str(), "MAT010");
    }

    #[tokio::test]
    async fn update_quantity_unknown_id_is_not_found() {
        let svc = service();
        let err = svc
            .update_quantity(&ItemId::parse("MAT001").unwrap(), 3)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Store(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn remove_clamps_at_zero() {
        let svc = service();
        let mut draft = material_draft("PET Recycled Flakes", Location::LocationOne);
        draft.stock = 5;
        let item = svc.add_item(draft).await.unwrap();

        let updated = svc
            .adjust_quantity(&item.id, StockAdjustment::remove(100).unwrap())
            .await
            .unwrap();
        assert_eq!(updated.stock, 0);
    }

    #[tokio::test]
    async fn quick_adjust_arithmetic() {
        let svc = service();
        let mut draft = material_draft("Masterbatch Blue", Location::LocationTwo);
        draft.stock = 5;
        let item = svc.add_item(draft).await.unwrap();

        let up = svc
            .adjust_quantity(&item.id, StockAdjustment::add(10).unwrap())
            .await
            .unwrap();
        assert_eq!(up.stock, 15);

        let down = svc
            .adjust_quantity(&item.id, StockAdjustment::remove(10).unwrap())
            .await
            .unwrap();
        assert_eq!(down.stock, 5);
    }

    #[tokio::test]
    async fn list_filters_by_category_within_the_location() {
        let svc = service();
        svc.add_item(material_draft("HDPE Pellets", Location::LocationOne))
            .await
            .unwrap();
        svc.add_item(product_draft("Water Bottles 500ml", Location::LocationOne))
            .await
            .unwrap();
        // Same category, other location: must not leak into the listing.
        svc.add_item(product_draft("Water Bottles 1l", Location::LocationTwo))
            .await
            .unwrap();

        let filter = ItemFilter {
            search: String::new(),
            category: CategoryFilter::One(Category::Product),
        };
        let listed = svc.list_items(Location::LocationOne, &filter).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Water Bottles 500ml");
    }

    #[tokio::test]
    async fn stats_reflect_mutations_on_next_read() {
        let svc = service();
        let mut draft = material_draft("HDPE Pellets", Location::LocationOne);
        draft.stock = 60;
        draft.price = 2.0;
        let item = svc.add_item(draft).await.unwrap();

        let before = svc.location_stats(Location::LocationOne).await.unwrap();
        assert_eq!(before.total_items, 1);
        assert_eq!(before.low_stock, 0);
        assert_eq!(before.total_value, 120.0);

        svc.update_quantity(&item.id, 0).await.unwrap();
        let after = svc.location_stats(Location::LocationOne).await.unwrap();
        assert_eq!(after.low_stock, 1);
        assert_eq!(after.out_of_stock, 1);
        assert_eq!(after.total_value, 0.0);
    }
}

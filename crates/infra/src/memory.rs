//! In-memory adapters for dev and tests.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use stockline_auth::UserProfile;
use stockline_core::{SessionToken, SubjectId};
use stockline_inventory::{Category, InventoryItem, ItemId, Location};

use crate::provider::{IdentityProvider, ProviderError, ProviderSession};
use crate::store::{ItemStore, ProfileStore, StoreError};

fn poisoned() -> StoreError {
    StoreError::Unavailable("store lock poisoned".to_string())
}

/// In-memory inventory table. Insertion order is preserved so listing can
/// rely on it for deterministic output.
#[derive(Debug, Default)]
pub struct InMemoryItemStore {
    inner: RwLock<Vec<InventoryItem>>,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemStore for InMemoryItemStore {
    async fn insert(&self, item: InventoryItem) -> Result<(), StoreError> {
        let mut items = self.inner.write().map_err(|_| poisoned())?;
        if items.iter().any(|existing| existing.id == item.id) {
            return Err(StoreError::Duplicate(item.id));
        }
        items.push(item);
        Ok(())
    }

    async fn get(&self, id: &ItemId) -> Result<InventoryItem, StoreError> {
        let items = self.inner.read().map_err(|_| poisoned())?;
        items
            .iter()
            .find(|item| &item.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_by_location(&self, location: Location) -> Result<Vec<InventoryItem>, StoreError> {
        let items = self.inner.read().map_err(|_| poisoned())?;
        let mut out: Vec<InventoryItem> = items
            .iter()
            .filter(|item| item.location == location)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn set_stock(
        &self,
        id: &ItemId,
        stock: u32,
        updated_at: DateTime<Utc>,
    ) -> Result<InventoryItem, StoreError> {
        let mut items = self.inner.write().map_err(|_| poisoned())?;
        let item = items
            .iter_mut()
            .find(|item| &item.id == id)
            .ok_or(StoreError::NotFound)?;
        item.stock = stock;
        item.updated_at = updated_at;
        Ok(item.clone())
    }

    async fn count_by_category(&self, category: Category) -> Result<u64, StoreError> {
        let items = self.inner.read().map_err(|_| poisoned())?;
        Ok(items.iter().filter(|item| item.category() == category).count() as u64)
    }
}

/// In-memory user registry.
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    inner: RwLock<HashMap<SubjectId, UserProfile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provision a profile row (stand-in for the external registry).
    pub fn insert(&self, subject: SubjectId, profile: UserProfile) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(subject, profile);
        }
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn find_by_subject(&self, subject: SubjectId) -> Result<Option<UserProfile>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.get(&subject).cloned())
    }
}

/// Identity provider with a fixed credential table, for dev and tests.
///
/// Issues opaque uuid tokens and keeps them live until signed out, which is
/// enough to exercise the gate's restore and revocation paths.
#[derive(Debug, Default)]
pub struct StaticIdentityProvider {
    credentials: HashMap<String, (String, SubjectId)>,
    active: RwLock<HashMap<SessionToken, SubjectId>>,
}

impl StaticIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
        subject: SubjectId,
    ) -> Self {
        self.credentials
            .insert(username.into(), (password.into(), subject));
        self
    }

    /// Number of live provider sessions. Test hook for revocation checks.
    pub fn active_session_count(&self) -> usize {
        self.active.read().map(|m| m.len()).unwrap_or(0)
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn sign_in(
        &self,
        username: &str,
        password: &str,
    ) -> Result<ProviderSession, ProviderError> {
        let (expected, subject) = self
            .credentials
            .get(username)
            .ok_or(ProviderError::InvalidCredentials)?;
        if expected != password {
            return Err(ProviderError::InvalidCredentials);
        }

        let token = SessionToken::new();
        self.active
            .write()
            .map_err(|_| ProviderError::Unavailable("provider lock poisoned".to_string()))?
            .insert(token, *subject);

        Ok(ProviderSession {
            subject_id: *subject,
            token,
        })
    }

    async fn sign_out(&self, token: &SessionToken) -> Result<(), ProviderError> {
        self.active
            .write()
            .map_err(|_| ProviderError::Unavailable("provider lock poisoned".to_string()))?
            .remove(token);
        Ok(())
    }

    async fn restore(&self, token: &SessionToken) -> Result<Option<SubjectId>, ProviderError> {
        let active = self
            .active
            .read()
            .map_err(|_| ProviderError::Unavailable("provider lock poisoned".to_string()))?;
        Ok(active.get(token).copied())
    }
}

#[cfg(test)]
mod tests {
    use stockline_inventory::{Classification, ItemDraft, ItemStatus, MaterialType};

    use super::*;

    fn draft(location: Location) -> ItemDraft {
        ItemDraft {
            name: "Masterbatch Blue".to_string(),
            classification: Classification::Material(MaterialType::Master),
            price: 3.5,
            stock: 150,
            status: ItemStatus::InStock,
            note: String::new(),
            location,
        }
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_ids() {
        let store = InMemoryItemStore::new();
        let id = ItemId::derive(Category::Material, 0);
        let item = draft(Location::LocationOne).materialize(id.clone(), Utc::now());
        store.insert(item.clone()).await.unwrap();

        let err = store.insert(item).await.unwrap_err();
        assert_eq!(err, StoreError::Duplicate(id));
    }

    #[tokio::test]
    async fn list_is_partitioned_by_location() {
        let store = InMemoryItemStore::new();
        let a = draft(Location::LocationOne).materialize(ItemId::derive(Category::Material, 0), Utc::now());
        let b = draft(Location::LocationTwo).materialize(ItemId::derive(Category::Material, 1), Utc::now());
        store.insert(a).await.unwrap();
        store.insert(b).await.unwrap();

        let one = store.list_by_location(Location::LocationOne).await.unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].id.as_str(), "MAT001");
        assert_eq!(store.count_by_category(Category::Material).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn set_stock_touches_only_stock_and_updated_at() {
        let store = InMemoryItemStore::new();
        let item = draft(Location::LocationOne).materialize(ItemId::derive(Category::Material, 0), Utc::now());
        let created_at = item.created_at;
        store.insert(item.clone()).await.unwrap();

        let later = Utc::now();
        let updated = store.set_stock(&item.id, 7, later).await.unwrap();
        assert_eq!(updated.stock, 7);
        assert_eq!(updated.updated_at, later);
        assert_eq!(updated.created_at, created_at);
        assert_eq!(updated.name, item.name);
    }

    #[tokio::test]
    async fn set_stock_on_unknown_id_is_not_found() {
        let store = InMemoryItemStore::new();
        let err = store
            .set_stock(&ItemId::parse("MAT001").unwrap(), 1, Utc::now())
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::NotFound);
    }

    #[tokio::test]
    async fn provider_sign_in_and_restore() {
        let subject = SubjectId::new();
        let provider = StaticIdentityProvider::new().with_user("owner", "owner123", subject);

        assert_eq!(
            provider.sign_in("owner", "wrong").await.unwrap_err(),
            ProviderError::InvalidCredentials
        );

        let session = provider.sign_in("owner", "owner123").await.unwrap();
        assert_eq!(session.subject_id, subject);
        assert_eq!(provider.restore(&session.token).await.unwrap(), Some(subject));

        provider.sign_out(&session.token).await.unwrap();
        assert_eq!(provider.restore(&session.token).await.unwrap(), None);
        // Second sign-out is fine.
        provider.sign_out(&session.token).await.unwrap();
    }
}

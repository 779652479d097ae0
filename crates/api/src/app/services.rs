//! Backend wiring: which stores and which identity provider the process runs
//! against.
//!
//! In-memory wiring (default) is self-contained: demo credentials and profile
//! rows matching the factory's two staff accounts. Persistent wiring keeps
//! records in Postgres; credential verification still goes through the
//! `IdentityProvider` seam, configured from `STOCKLINE_CREDENTIALS` until a
//! real external provider is wired in behind the same trait.

use std::sync::Arc;

use sqlx::PgPool;

use stockline_auth::{Role, UserProfile};
use stockline_core::{ProfileId, SubjectId};
use stockline_infra::{
    IdentityProvider, InMemoryItemStore, InMemoryProfileStore, InventoryService, ItemStore,
    PostgresItemStore, PostgresProfileStore, ProfileStore, SessionGate, StaticIdentityProvider,
};

/// Everything the handlers need, behind one object.
pub struct AppServices {
    inventory: InventoryService<Arc<dyn ItemStore>>,
    gate: SessionGate,
}

impl AppServices {
    pub fn new(inventory: InventoryService<Arc<dyn ItemStore>>, gate: SessionGate) -> Self {
        Self { inventory, gate }
    }

    pub fn inventory(&self) -> &InventoryService<Arc<dyn ItemStore>> {
        &self.inventory
    }

    pub fn gate(&self) -> &SessionGate {
        &self.gate
    }
}

pub async fn build_services() -> AppServices {
    let use_persistent = std::env::var("USE_PERSISTENT_STORES")
        .unwrap_or_else(|_| "false".to_string())
        .parse::<bool>()
        .unwrap_or(false);

    if use_persistent {
        build_persistent_services().await
    } else {
        build_in_memory_services()
    }
}

/// In-memory wiring (dev/test): empty inventory plus the two demo staff
/// accounts (`owner`/`owner123`, `worker`/`worker123`).
pub fn build_in_memory_services() -> AppServices {
    let store: Arc<dyn ItemStore> = Arc::new(InMemoryItemStore::new());

    let owner_subject = SubjectId::new();
    let worker_subject = SubjectId::new();

    let provider: Arc<dyn IdentityProvider> = Arc::new(
        StaticIdentityProvider::new()
            .with_user("owner", "owner123", owner_subject)
            .with_user("worker", "worker123", worker_subject),
    );

    let profiles = Arc::new(InMemoryProfileStore::new());
    profiles.insert(
        owner_subject,
        demo_profile(owner_subject, "owner", Role::Owner, "Factory Owner"),
    );
    profiles.insert(
        worker_subject,
        demo_profile(worker_subject, "worker", Role::Worker, "Factory Worker"),
    );
    let profiles: Arc<dyn ProfileStore> = profiles;

    AppServices::new(
        InventoryService::new(store),
        SessionGate::new(provider, profiles),
    )
}

async fn build_persistent_services() -> AppServices {
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set when USE_PERSISTENT_STORES=true");

    let pool = PgPool::connect(&database_url)
        .await
        .expect("failed to connect to Postgres");

    let store: Arc<dyn ItemStore> = Arc::new(PostgresItemStore::new(pool.clone()));
    let profiles: Arc<dyn ProfileStore> = Arc::new(PostgresProfileStore::new(pool));
    let provider: Arc<dyn IdentityProvider> = Arc::new(credentials_from_env());

    AppServices::new(
        InventoryService::new(store),
        SessionGate::new(provider, profiles),
    )
}

fn demo_profile(subject: SubjectId, username: &str, role: Role, name: &str) -> UserProfile {
    UserProfile {
        id: ProfileId::from_uuid(*subject.as_uuid()),
        username: username.to_string(),
        role,
        name: name.to_string(),
        created_at: None,
    }
}

/// Parse `STOCKLINE_CREDENTIALS` — comma-separated
/// `username:password:subject-uuid` triples whose subjects must match rows in
/// the `users` table.
fn credentials_from_env() -> StaticIdentityProvider {
    let raw = match std::env::var("STOCKLINE_CREDENTIALS") {
        Ok(raw) => raw,
        Err(_) => {
            tracing::warn!("STOCKLINE_CREDENTIALS not set; no sign-in will succeed");
            return StaticIdentityProvider::new();
        }
    };

    let mut provider = StaticIdentityProvider::new();
    for entry in raw.split(',').filter(|e| !e.trim().is_empty()) {
        let mut parts = entry.trim().splitn(3, ':');
        let (username, password, subject) = (parts.next(), parts.next(), parts.next());
        match (username, password, subject.map(str::parse::<SubjectId>)) {
            (Some(username), Some(password), Some(Ok(subject))) => {
                provider = provider.with_user(username, password, subject);
            }
            _ => {
                tracing::warn!("skipping malformed STOCKLINE_CREDENTIALS entry");
            }
        }
    }
    provider
}

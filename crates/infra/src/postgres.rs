//! Postgres-backed stores.
//!
//! Schema lives in `migrations/0001_init.sql` (an `inventory_items` table and
//! a `users` profile table keyed by the identity provider's subject id).
//! Every enum column stores the wire string of the corresponding closed enum;
//! rows that fail to parse back are reported as backend faults rather than
//! silently skipped.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use stockline_auth::{Role, UserProfile};
use stockline_core::{ProfileId, SubjectId};
use stockline_inventory::{
    Category, Classification, InventoryItem, ItemId, ItemStatus, Location, MaterialType,
};

use crate::store::{ItemStore, ProfileStore, StoreError};

fn corrupt(detail: impl std::fmt::Display) -> StoreError {
    StoreError::Unavailable(format!("corrupt row: {detail}"))
}

fn sqlx_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        other => StoreError::Unavailable(other.to_string()),
    }
}

fn item_from_row(row: &PgRow) -> Result<InventoryItem, StoreError> {
    let id: String = row.try_get("id").map_err(corrupt)?;
    let name: String = row.try_get("item_name").map_err(corrupt)?;
    let category: String = row.try_get("category").map_err(corrupt)?;
    let material_type: Option<String> = row.try_get("type").map_err(corrupt)?;
    let price: f64 = row.try_get("price").map_err(corrupt)?;
    let stock: i64 = row.try_get("stock").map_err(corrupt)?;
    let status: String = row.try_get("status").map_err(corrupt)?;
    let note: String = row.try_get("note").map_err(corrupt)?;
    let location: String = row.try_get("location").map_err(corrupt)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(corrupt)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(corrupt)?;

    let category: Category = category.parse().map_err(corrupt)?;
    let material_type = material_type
        .map(|t| t.parse::<MaterialType>())
        .transpose()
        .map_err(corrupt)?;
    let classification = Classification::new(category, material_type).map_err(corrupt)?;

    Ok(InventoryItem {
        id: ItemId::parse(&id).map_err(corrupt)?,
        name,
        classification,
        price,
        stock: u32::try_from(stock).map_err(|_| corrupt(format!("negative stock: {stock}")))?,
        status: status.parse::<ItemStatus>().map_err(corrupt)?,
        note,
        location: location.parse::<Location>().map_err(corrupt)?,
        created_at,
        updated_at,
    })
}

/// `inventory_items` table adapter.
pub struct PostgresItemStore {
    pool: PgPool,
}

impl PostgresItemStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemStore for PostgresItemStore {
    async fn insert(&self, item: InventoryItem) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO inventory_items (
                id, item_name, category, type, price, stock, status, note,
                location, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(item.id.as_str())
        .bind(&item.name)
        .bind(item.category().as_str())
        .bind(item.classification.material_type().map(|t| t.as_str()))
        .bind(item.price)
        .bind(i64::from(item.stock))
        .bind(item.status.as_str())
        .bind(&item.note)
        .bind(item.location.as_str())
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(StoreError::Duplicate(item.id))
            }
            Err(err) => Err(sqlx_error(err)),
        }
    }

    async fn get(&self, id: &ItemId) -> Result<InventoryItem, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, item_name, category, type, price, stock, status, note,
                   location, created_at, updated_at
            FROM inventory_items
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(sqlx_error)?;

        match row {
            Some(row) => item_from_row(&row),
            None => Err(StoreError::NotFound),
        }
    }

    async fn list_by_location(&self, location: Location) -> Result<Vec<InventoryItem>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, item_name, category, type, price, stock, status, note,
                   location, created_at, updated_at
            FROM inventory_items
            WHERE location = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(location.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(sqlx_error)?;

        rows.iter().map(item_from_row).collect()
    }

    async fn set_stock(
        &self,
        id: &ItemId,
        stock: u32,
        updated_at: DateTime<Utc>,
    ) -> Result<InventoryItem, StoreError> {
        let row = sqlx::query(
            r#"
            UPDATE inventory_items
            SET stock = $2, updated_at = $3
            WHERE id = $1
            RETURNING id, item_name, category, type, price, stock, status, note,
                      location, created_at, updated_at
            "#,
        )
        .bind(id.as_str())
        .bind(i64::from(stock))
        .bind(updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(sqlx_error)?;

        match row {
            Some(row) => item_from_row(&row),
            None => Err(StoreError::NotFound),
        }
    }

    async fn count_by_category(&self, category: Category) -> Result<u64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM inventory_items WHERE category = $1")
            .bind(category.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(sqlx_error)?;

        let n: i64 = row.try_get("n").map_err(corrupt)?;
        Ok(n.max(0) as u64)
    }
}

/// `users` table adapter (the externally-provisioned profile registry).
pub struct PostgresProfileStore {
    pool: PgPool,
}

impl PostgresProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PostgresProfileStore {
    async fn find_by_subject(&self, subject: SubjectId) -> Result<Option<UserProfile>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, role, name, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(subject.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(sqlx_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let id: uuid::Uuid = row.try_get("id").map_err(corrupt)?;
        let username: String = row.try_get("username").map_err(corrupt)?;
        let role: String = row.try_get("role").map_err(corrupt)?;
        let name: String = row.try_get("name").map_err(corrupt)?;
        let created_at: Option<DateTime<Utc>> = row.try_get("created_at").map_err(corrupt)?;

        Ok(Some(UserProfile {
            id: ProfileId::from_uuid(id),
            username,
            role: role.parse::<Role>().map_err(corrupt)?,
            name,
            created_at,
        }))
    }
}

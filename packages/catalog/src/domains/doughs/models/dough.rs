use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use typed_builder::TypedBuilder;

use crate::common::{CatalogError, CatalogResult, DoughId};

/// Pizza base variant; every pizza can be ordered on every dough.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Dough {
    pub id: DoughId,
    pub name: String,
    pub is_protected: bool,
    pub notes: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    /// Exactly one dough is the base; pizza listings are priced on it
    pub is_base: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Desired state of a dough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct DoughInput {
    pub name: String,
    #[builder(default)]
    #[serde(default)]
    pub is_protected: bool,
    #[builder(default, setter(strip_option))]
    #[serde(default)]
    pub notes: Option<String>,
    pub price: Decimal,
    #[builder(default)]
    #[serde(default)]
    pub stock: i32,
}

impl Dough {
    /// Fields whose change bumps `updated_at`; stock is not one of them.
    pub fn content_differs(&self, input: &DoughInput) -> bool {
        self.name != input.name
            || self.is_protected != input.is_protected
            || self.notes != input.notes
            || self.price != input.price
    }

    pub fn stock_differs(&self, input: &DoughInput) -> bool {
        self.stock != input.stock
    }

    // =========================================================================
    // Locked queries (inside a catalog transaction)
    // =========================================================================

    pub async fn lock(id: DoughId, conn: &mut PgConnection) -> CatalogResult<Option<Self>> {
        sqlx::query_as::<_, Dough>("SELECT * FROM doughs WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await
            .map_err(Into::into)
    }

    pub async fn insert(input: &DoughInput, conn: &mut PgConnection) -> CatalogResult<DoughId> {
        sqlx::query_scalar::<_, DoughId>(
            r#"
            INSERT INTO doughs (name, is_protected, notes, price, stock)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&input.name)
        .bind(input.is_protected)
        .bind(&input.notes)
        .bind(input.price)
        .bind(input.stock)
        .fetch_one(conn)
        .await
        .map_err(Into::into)
    }

    /// Write every scalar column; `updated_at` is left to the bump plan.
    pub async fn update(id: DoughId, input: &DoughInput, conn: &mut PgConnection) -> CatalogResult<()> {
        sqlx::query(
            r#"
            UPDATE doughs
            SET name = $2, is_protected = $3, notes = $4, price = $5, stock = $6
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.is_protected)
        .bind(&input.notes)
        .bind(input.price)
        .bind(input.stock)
        .execute(conn)
        .await?;

        Ok(())
    }

    pub async fn delete(id: DoughId, conn: &mut PgConnection) -> CatalogResult<()> {
        sqlx::query("DELETE FROM doughs WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Add units to the stock without touching `updated_at`.
    pub async fn add_stock(id: DoughId, units: i32, conn: &mut PgConnection) -> CatalogResult<i32> {
        sqlx::query_scalar::<_, i32>(
            "UPDATE doughs SET stock = stock + $2 WHERE id = $1 RETURNING stock",
        )
        .bind(id)
        .bind(units)
        .fetch_one(conn)
        .await
        .map_err(Into::into)
    }

    /// Conditional decrement; returns false when the stock was short.
    pub async fn take_stock(id: DoughId, units: i32, conn: &mut PgConnection) -> CatalogResult<bool> {
        let result = sqlx::query("UPDATE doughs SET stock = stock - $2 WHERE id = $1 AND stock >= $2")
            .bind(id)
            .bind(units)
            .execute(conn)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    // =========================================================================
    // Unlocked reads
    // =========================================================================

    pub async fn find_by_id(id: DoughId, pool: &PgPool) -> CatalogResult<Option<Self>> {
        sqlx::query_as::<_, Dough>("SELECT * FROM doughs WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_all(pool: &PgPool) -> CatalogResult<Vec<Self>> {
        sqlx::query_as::<_, Dough>("SELECT * FROM doughs ORDER BY id")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    /// The base dough; its absence means the schema seed was lost.
    pub async fn find_base(pool: &PgPool) -> CatalogResult<Self> {
        sqlx::query_as::<_, Dough>("SELECT * FROM doughs WHERE is_base")
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| CatalogError::InternalInconsistency("no base dough configured".into()))
    }
}

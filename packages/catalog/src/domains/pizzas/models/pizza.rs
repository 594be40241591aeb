use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use typed_builder::TypedBuilder;

use crate::common::{CatalogResult, PizzaId};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Pizza {
    pub id: PizzaId,
    pub name: String,
    pub is_protected: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Desired state of a pizza, relations given by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct PizzaInput {
    pub name: String,
    #[builder(default)]
    #[serde(default)]
    pub is_protected: bool,
    #[builder(default, setter(strip_option))]
    #[serde(default)]
    pub notes: Option<String>,
    /// Directly assigned categories
    #[builder(default)]
    #[serde(default)]
    pub categories: BTreeSet<String>,
    #[builder(default)]
    #[serde(default)]
    pub ingredients: BTreeSet<String>,
}

impl Pizza {
    pub fn content_differs(&self, input: &PizzaInput) -> bool {
        self.name != input.name || self.is_protected != input.is_protected || self.notes != input.notes
    }

    pub async fn lock(id: PizzaId, conn: &mut PgConnection) -> CatalogResult<Option<Self>> {
        sqlx::query_as::<_, Pizza>("SELECT * FROM pizzas WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await
            .map_err(Into::into)
    }

    /// Share lock: the pizza must not be edited or deleted while an order reads it.
    pub async fn lock_shared(id: PizzaId, conn: &mut PgConnection) -> CatalogResult<Option<Self>> {
        sqlx::query_as::<_, Pizza>("SELECT * FROM pizzas WHERE id = $1 FOR SHARE")
            .bind(id)
            .fetch_optional(conn)
            .await
            .map_err(Into::into)
    }

    pub async fn insert(input: &PizzaInput, conn: &mut PgConnection) -> CatalogResult<PizzaId> {
        sqlx::query_scalar::<_, PizzaId>(
            "INSERT INTO pizzas (name, is_protected, notes) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&input.name)
        .bind(input.is_protected)
        .bind(&input.notes)
        .fetch_one(conn)
        .await
        .map_err(Into::into)
    }

    pub async fn update(id: PizzaId, input: &PizzaInput, conn: &mut PgConnection) -> CatalogResult<()> {
        sqlx::query("UPDATE pizzas SET name = $2, is_protected = $3, notes = $4 WHERE id = $1")
            .bind(id)
            .bind(&input.name)
            .bind(input.is_protected)
            .bind(&input.notes)
            .execute(conn)
            .await?;
        Ok(())
    }

    pub async fn delete(id: PizzaId, conn: &mut PgConnection) -> CatalogResult<()> {
        sqlx::query("DELETE FROM pizzas WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(())
    }

    pub async fn find_by_id(id: PizzaId, pool: &PgPool) -> CatalogResult<Option<Self>> {
        sqlx::query_as::<_, Pizza>("SELECT * FROM pizzas WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_all(pool: &PgPool) -> CatalogResult<Vec<Self>> {
        sqlx::query_as::<_, Pizza>("SELECT * FROM pizzas ORDER BY id")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }
}

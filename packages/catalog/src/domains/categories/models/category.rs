use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use typed_builder::TypedBuilder;

use crate::common::{CatalogResult, CategoryId};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub is_protected: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Desired state of a category, relations given by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct CategoryInput {
    pub name: String,
    #[builder(default)]
    #[serde(default)]
    pub is_protected: bool,
    #[builder(default, setter(strip_option))]
    #[serde(default)]
    pub notes: Option<String>,
    /// Pizzas the category is directly assigned to
    #[builder(default)]
    #[serde(default)]
    pub pizzas: BTreeSet<String>,
    #[builder(default)]
    #[serde(default)]
    pub enforcing_ingredients: BTreeSet<String>,
    #[builder(default)]
    #[serde(default)]
    pub incompatible_ingredients: BTreeSet<String>,
}

impl Category {
    pub fn content_differs(&self, input: &CategoryInput) -> bool {
        self.name != input.name || self.is_protected != input.is_protected || self.notes != input.notes
    }

    pub async fn lock(id: CategoryId, conn: &mut PgConnection) -> CatalogResult<Option<Self>> {
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await
            .map_err(Into::into)
    }

    pub async fn insert(input: &CategoryInput, conn: &mut PgConnection) -> CatalogResult<CategoryId> {
        sqlx::query_scalar::<_, CategoryId>(
            "INSERT INTO categories (name, is_protected, notes) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&input.name)
        .bind(input.is_protected)
        .bind(&input.notes)
        .fetch_one(conn)
        .await
        .map_err(Into::into)
    }

    pub async fn update(
        id: CategoryId,
        input: &CategoryInput,
        conn: &mut PgConnection,
    ) -> CatalogResult<()> {
        sqlx::query("UPDATE categories SET name = $2, is_protected = $3, notes = $4 WHERE id = $1")
            .bind(id)
            .bind(&input.name)
            .bind(input.is_protected)
            .bind(&input.notes)
            .execute(conn)
            .await?;
        Ok(())
    }

    pub async fn delete(id: CategoryId, conn: &mut PgConnection) -> CatalogResult<()> {
        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(())
    }

    pub async fn find_by_id(id: CategoryId, pool: &PgPool) -> CatalogResult<Option<Self>> {
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_all(pool: &PgPool) -> CatalogResult<Vec<Self>> {
        sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY id")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }
}

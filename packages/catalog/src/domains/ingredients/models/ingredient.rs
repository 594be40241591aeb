use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use typed_builder::TypedBuilder;

use crate::common::{CatalogResult, IngredientId, PizzaId};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub is_protected: bool,
    pub notes: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Desired state of an ingredient, relations given by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct IngredientInput {
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
    /// Pizzas carrying this ingredient
    #[builder(default)]
    #[serde(default)]
    pub pizzas: BTreeSet<String>,
    #[builder(default)]
    #[serde(default)]
    pub enforced_categories: BTreeSet<String>,
    #[builder(default)]
    #[serde(default)]
    pub incompatible_categories: BTreeSet<String>,
}

impl Ingredient {
    /// Fields whose change bumps `updated_at`; stock is not one of them.
    pub fn content_differs(&self, input: &IngredientInput) -> bool {
        self.name != input.name
            || self.is_protected != input.is_protected
            || self.notes != input.notes
            || self.price != input.price
    }

    pub fn stock_differs(&self, input: &IngredientInput) -> bool {
        self.stock != input.stock
    }

    // =========================================================================
    // Locked queries (inside a catalog transaction)
    // =========================================================================

    pub async fn lock(id: IngredientId, conn: &mut PgConnection) -> CatalogResult<Option<Self>> {
        sqlx::query_as::<_, Ingredient>("SELECT * FROM ingredients WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await
            .map_err(Into::into)
    }

    /// Lock the ingredients of a pizza in id order.
    pub async fn lock_for_pizza(pizza_id: PizzaId, conn: &mut PgConnection) -> CatalogResult<Vec<Self>> {
        sqlx::query_as::<_, Ingredient>(
            r#"
            SELECT i.*
            FROM ingredients i
            INNER JOIN pizzas_ingredients pi ON pi.ingredient_id = i.id
            WHERE pi.pizza_id = $1
            ORDER BY i.id
            FOR UPDATE OF i
            "#,
        )
        .bind(pizza_id)
        .fetch_all(conn)
        .await
        .map_err(Into::into)
    }

    pub async fn insert(input: &IngredientInput, conn: &mut PgConnection) -> CatalogResult<IngredientId> {
        sqlx::query_scalar::<_, IngredientId>(
            r#"
            INSERT INTO ingredients (name, is_protected, notes, price, stock)
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

    pub async fn update(
        id: IngredientId,
        input: &IngredientInput,
        conn: &mut PgConnection,
    ) -> CatalogResult<()> {
        sqlx::query(
            r#"
            UPDATE ingredients
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

    pub async fn delete(id: IngredientId, conn: &mut PgConnection) -> CatalogResult<()> {
        sqlx::query("DELETE FROM ingredients WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(())
    }

    pub async fn add_stock(id: IngredientId, units: i32, conn: &mut PgConnection) -> CatalogResult<i32> {
        sqlx::query_scalar::<_, i32>(
            "UPDATE ingredients SET stock = stock + $2 WHERE id = $1 RETURNING stock",
        )
        .bind(id)
        .bind(units)
        .fetch_one(conn)
        .await
        .map_err(Into::into)
    }

    /// Decrement every listed ingredient that holds at least `units`; returns
    /// how many rows were decremented.
    pub async fn take_stock(
        ids: &[IngredientId],
        units: i32,
        conn: &mut PgConnection,
    ) -> CatalogResult<u64> {
        let result = sqlx::query(
            "UPDATE ingredients SET stock = stock - $2 WHERE id = ANY($1) AND stock >= $2",
        )
        .bind(ids)
        .bind(units)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    // =========================================================================
    // Unlocked reads
    // =========================================================================

    pub async fn find_by_id(id: IngredientId, pool: &PgPool) -> CatalogResult<Option<Self>> {
        sqlx::query_as::<_, Ingredient>("SELECT * FROM ingredients WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_all(pool: &PgPool) -> CatalogResult<Vec<Self>> {
        sqlx::query_as::<_, Ingredient>("SELECT * FROM ingredients ORDER BY id")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    /// Ingredients of one pizza, ordered by id.
    pub async fn find_for_pizza(
        pizza_id: PizzaId,
        pool: &PgPool,
    ) -> CatalogResult<Vec<Self>> {
        sqlx::query_as::<_, Ingredient>(
            r#"
            SELECT i.*
            FROM ingredients i
            INNER JOIN pizzas_ingredients pi ON pi.ingredient_id = i.id
            WHERE pi.pizza_id = $1
            ORDER BY i.id
            "#,
        )
        .bind(pizza_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}

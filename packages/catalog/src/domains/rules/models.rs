use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{CatalogResult, CategoryId, IngredientId, PizzaId};

/// Effect an ingredient has on a category when it is on a pizza.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "rule_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RuleType {
    /// The category applies to every pizza carrying the ingredient
    Enforcing,
    /// The category never applies to a pizza carrying the ingredient
    Incompatible,
}

impl std::fmt::Display for RuleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleType::Enforcing => write!(f, "enforcing"),
            RuleType::Incompatible => write!(f, "incompatible"),
        }
    }
}

/// One row of `ingredients_categories_rules`; unique per (ingredient, category).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RuleEdge {
    pub ingredient_id: IngredientId,
    pub category_id: CategoryId,
    pub rule_type: RuleType,
}

/// A (pizza, ingredient) membership row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct PizzaIngredientRow {
    pub pizza_id: PizzaId,
    pub ingredient_id: IngredientId,
}

/// A (pizza, category) assignment row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct PizzaCategoryRow {
    pub pizza_id: PizzaId,
    pub category_id: CategoryId,
}

// =============================================================================
// Unlocked read queries
// =============================================================================

impl RuleEdge {
    /// Every rule edge, ordered by (ingredient, category).
    pub async fn find_all(pool: &PgPool) -> CatalogResult<Vec<Self>> {
        sqlx::query_as::<_, RuleEdge>(
            r#"
            SELECT ingredient_id, category_id, rule_type
            FROM ingredients_categories_rules
            ORDER BY ingredient_id, category_id
            "#,
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Rules attached to any of the given ingredients.
    pub async fn find_for_ingredients(
        ingredient_ids: &[IngredientId],
        pool: &PgPool,
    ) -> CatalogResult<Vec<Self>> {
        sqlx::query_as::<_, RuleEdge>(
            r#"
            SELECT ingredient_id, category_id, rule_type
            FROM ingredients_categories_rules
            WHERE ingredient_id = ANY($1)
            ORDER BY ingredient_id, category_id
            "#,
        )
        .bind(ingredient_ids)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Rules pointing at one category.
    pub async fn find_for_category(
        category_id: CategoryId,
        pool: &PgPool,
    ) -> CatalogResult<Vec<Self>> {
        sqlx::query_as::<_, RuleEdge>(
            r#"
            SELECT ingredient_id, category_id, rule_type
            FROM ingredients_categories_rules
            WHERE category_id = $1
            ORDER BY ingredient_id
            "#,
        )
        .bind(category_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}

impl PizzaIngredientRow {
    pub async fn find_all(pool: &PgPool) -> CatalogResult<Vec<Self>> {
        sqlx::query_as::<_, PizzaIngredientRow>(
            "SELECT pizza_id, ingredient_id FROM pizzas_ingredients ORDER BY pizza_id, ingredient_id",
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Memberships of every pizza that contains one of `ingredient_ids`.
    pub async fn find_for_ingredients(
        ingredient_ids: &[IngredientId],
        pool: &PgPool,
    ) -> CatalogResult<Vec<Self>> {
        sqlx::query_as::<_, PizzaIngredientRow>(
            r#"
            SELECT pizza_id, ingredient_id
            FROM pizzas_ingredients
            WHERE ingredient_id = ANY($1)
            ORDER BY pizza_id, ingredient_id
            "#,
        )
        .bind(ingredient_ids)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}

impl PizzaCategoryRow {
    pub async fn find_all(pool: &PgPool) -> CatalogResult<Vec<Self>> {
        sqlx::query_as::<_, PizzaCategoryRow>(
            "SELECT pizza_id, category_id FROM pizzas_categories ORDER BY pizza_id, category_id",
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_for_pizza(pizza_id: PizzaId, pool: &PgPool) -> CatalogResult<Vec<Self>> {
        sqlx::query_as::<_, PizzaCategoryRow>(
            r#"
            SELECT pizza_id, category_id
            FROM pizzas_categories
            WHERE pizza_id = $1
            ORDER BY category_id
            "#,
        )
        .bind(pizza_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_for_category(
        category_id: CategoryId,
        pool: &PgPool,
    ) -> CatalogResult<Vec<Self>> {
        sqlx::query_as::<_, PizzaCategoryRow>(
            r#"
            SELECT pizza_id, category_id
            FROM pizzas_categories
            WHERE category_id = $1
            ORDER BY pizza_id
            "#,
        )
        .bind(category_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}

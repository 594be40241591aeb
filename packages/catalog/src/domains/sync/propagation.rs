//! Which `updated_at` columns a mutation bumps.
//!
//! | Target     | Own timestamp                                  | Related timestamps                                  |
//! |------------|------------------------------------------------|-----------------------------------------------------|
//! | Pizza      | content changed, or category/ingredient links   | never                                               |
//! | Ingredient | content (not stock) changed, or its rules       | categories whose rule changed; pizzas re-linked     |
//! | Category   | content changed, or its rules                   | ingredients whose rule changed; pizzas re-linked    |
//! | Dough      | content (not stock) changed                     | none                                                |
//!
//! Restocking and order placement never bump anything.

use serde::Serialize;
use sqlx::PgConnection;

use crate::common::{CatalogResult, CatalogTable, CategoryId, DoughId, EntityId, Id, IngredientId, PizzaId};
use crate::kernel::diff::{RelationDiff, RuleDiff};

/// The set of rows whose `updated_at` must be set to the transaction time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BumpPlan {
    pub pizzas: Vec<PizzaId>,
    pub ingredients: Vec<IngredientId>,
    pub categories: Vec<CategoryId>,
    pub doughs: Vec<DoughId>,
}

impl BumpPlan {
    pub fn for_pizza(
        id: PizzaId,
        content_changed: bool,
        categories: &RelationDiff<CategoryId>,
        ingredients: &RelationDiff<IngredientId>,
    ) -> Self {
        let mut plan = Self::default();
        // Membership is the pizza's own business, never its counterparts'
        if content_changed || !categories.is_empty() || !ingredients.is_empty() {
            plan.pizzas.push(id);
        }
        plan
    }

    pub fn for_ingredient(
        id: IngredientId,
        content_changed: bool,
        rules: &RuleDiff<CategoryId>,
        pizzas: &RelationDiff<PizzaId>,
    ) -> Self {
        let mut plan = Self {
            pizzas: pizzas.touched(),
            categories: rules.touched(),
            ..Self::default()
        };
        if content_changed || !rules.is_empty() {
            plan.ingredients.push(id);
        }
        plan
    }

    pub fn for_category(
        id: CategoryId,
        content_changed: bool,
        rules: &RuleDiff<IngredientId>,
        pizzas: &RelationDiff<PizzaId>,
    ) -> Self {
        let mut plan = Self {
            pizzas: pizzas.touched(),
            ingredients: rules.touched(),
            ..Self::default()
        };
        if content_changed || !rules.is_empty() {
            plan.categories.push(id);
        }
        plan
    }

    pub fn for_dough(id: DoughId, content_changed: bool) -> Self {
        let mut plan = Self::default();
        if content_changed {
            plan.doughs.push(id);
        }
        plan
    }

    /// Drop an entity from the plan; a freshly created row keeps `updated_at = NULL`.
    pub fn without(mut self, entity: impl Into<EntityId>) -> Self {
        match entity.into() {
            EntityId::Pizza(id) => self.pizzas.retain(|p| *p != id),
            EntityId::Ingredient(id) => self.ingredients.retain(|i| *i != id),
            EntityId::Category(id) => self.categories.retain(|c| *c != id),
            EntityId::Dough(id) => self.doughs.retain(|d| *d != id),
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pizzas.is_empty()
            && self.ingredients.is_empty()
            && self.categories.is_empty()
            && self.doughs.is_empty()
    }

    /// Stamp every planned row with `CURRENT_TIMESTAMP` (the transaction start).
    pub async fn apply(&self, conn: &mut PgConnection) -> CatalogResult<()> {
        bump(CatalogTable::Pizzas, &self.pizzas, conn).await?;
        bump(CatalogTable::Ingredients, &self.ingredients, conn).await?;
        bump(CatalogTable::Categories, &self.categories, conn).await?;
        bump(CatalogTable::Doughs, &self.doughs, conn).await?;
        Ok(())
    }
}

async fn bump<T>(table: CatalogTable, ids: &[Id<T>], conn: &mut PgConnection) -> CatalogResult<()> {
    if ids.is_empty() {
        return Ok(());
    }

    sqlx::query(&format!(
        "UPDATE {} SET updated_at = CURRENT_TIMESTAMP WHERE id = ANY($1)",
        table.table_name()
    ))
    .bind(ids)
    .execute(conn)
    .await?;

    Ok(())
}

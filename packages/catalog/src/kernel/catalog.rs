//! Catalog - the entry point callers use.
//!
//! Holds the pool and the transaction policy. Every mutation runs as one unit
//! of work through [`with_transaction`]; reads go straight to the pool.

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};

use super::lookups;
use super::transaction::{with_transaction, TransactionPolicy};
use crate::common::{
    CatalogEntity, CatalogResult, CategoryId, DoughId, EntityId, EntityName, Id, IngredientId,
    PizzaId,
};
use crate::config::Config;
use crate::domains::categories::{self, CategoryBrief, CategoryDetail, CategoryEdit, CategoryInput};
use crate::domains::doughs::{self, Dough, DoughBrief, DoughEdit, DoughInput};
use crate::domains::ingredients::{
    self, IngredientBrief, IngredientDetail, IngredientEdit, IngredientInput,
};
use crate::domains::pizzas::{self, PizzaBrief, PizzaDetail, PizzaEdit, PizzaInput};
use crate::domains::stock::{self, DoughVariant, OrderRequest, RestockRequest};
use crate::domains::sync::MutationResult;

/// A create (`id: None`) or full-state update of one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MutationRequest {
    Pizza {
        id: Option<PizzaId>,
        input: PizzaInput,
    },
    Ingredient {
        id: Option<IngredientId>,
        input: IngredientInput,
    },
    Category {
        id: Option<CategoryId>,
        input: CategoryInput,
    },
    Dough {
        id: Option<DoughId>,
        input: DoughInput,
    },
}

#[derive(Clone)]
pub struct Catalog {
    pool: PgPool,
    policy: TransactionPolicy,
    stock_max: i32,
}

impl Catalog {
    pub fn new(pool: PgPool, policy: TransactionPolicy, stock_max: i32) -> Self {
        Self {
            pool,
            policy,
            stock_max,
        }
    }

    pub fn from_config(pool: PgPool, config: &Config) -> Self {
        Self::new(pool, config.transaction_policy(), config.stock_max)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn transaction<T, F>(&self, unit_of_work: F) -> CatalogResult<T>
    where
        T: Send,
        F: for<'c> FnMut(&'c mut PgConnection) -> BoxFuture<'c, CatalogResult<T>>,
    {
        with_transaction(&self.pool, &self.policy, unit_of_work).await
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Dispatch a create or update to the matching entity.
    pub async fn mutate(&self, request: MutationRequest) -> CatalogResult<MutationResult<EntityId>> {
        match request {
            MutationRequest::Pizza { id, input } => {
                let result = match id {
                    Some(id) => self.update_pizza(id, input).await?,
                    None => self.create_pizza(input).await?,
                };
                Ok(widen(result))
            }
            MutationRequest::Ingredient { id, input } => {
                let result = match id {
                    Some(id) => self.update_ingredient(id, input).await?,
                    None => self.create_ingredient(input).await?,
                };
                Ok(widen(result))
            }
            MutationRequest::Category { id, input } => {
                let result = match id {
                    Some(id) => self.update_category(id, input).await?,
                    None => self.create_category(input).await?,
                };
                Ok(widen(result))
            }
            MutationRequest::Dough { id, input } => {
                let result = match id {
                    Some(id) => self.update_dough(id, input).await?,
                    None => self.create_dough(input).await?,
                };
                Ok(widen(result))
            }
        }
    }

    /// Delete any entity by tagged id.
    pub async fn delete(&self, id: EntityId) -> CatalogResult<MutationResult<EntityId>> {
        match id {
            EntityId::Pizza(id) => self.delete_pizza(id).await.map(widen),
            EntityId::Ingredient(id) => self.delete_ingredient(id).await.map(widen),
            EntityId::Category(id) => self.delete_category(id).await.map(widen),
            EntityId::Dough(id) => self.delete_dough(id).await.map(widen),
        }
    }

    pub async fn create_pizza(&self, input: PizzaInput) -> CatalogResult<MutationResult<PizzaId>> {
        self.transaction(move |conn| {
            let input = input.clone();
            Box::pin(async move { pizzas::actions::create_pizza(&input, conn).await })
        })
        .await
    }

    pub async fn update_pizza(
        &self,
        id: PizzaId,
        input: PizzaInput,
    ) -> CatalogResult<MutationResult<PizzaId>> {
        self.transaction(move |conn| {
            let input = input.clone();
            Box::pin(async move { pizzas::actions::update_pizza(id, &input, conn).await })
        })
        .await
    }

    pub async fn delete_pizza(&self, id: PizzaId) -> CatalogResult<MutationResult<PizzaId>> {
        self.transaction(move |conn| Box::pin(pizzas::actions::delete_pizza(id, conn)))
            .await
    }

    pub async fn create_ingredient(
        &self,
        input: IngredientInput,
    ) -> CatalogResult<MutationResult<IngredientId>> {
        self.transaction(move |conn| {
            let input = input.clone();
            Box::pin(async move { ingredients::actions::create_ingredient(&input, conn).await })
        })
        .await
    }

    pub async fn update_ingredient(
        &self,
        id: IngredientId,
        input: IngredientInput,
    ) -> CatalogResult<MutationResult<IngredientId>> {
        self.transaction(move |conn| {
            let input = input.clone();
            Box::pin(async move { ingredients::actions::update_ingredient(id, &input, conn).await })
        })
        .await
    }

    pub async fn delete_ingredient(
        &self,
        id: IngredientId,
    ) -> CatalogResult<MutationResult<IngredientId>> {
        self.transaction(move |conn| Box::pin(ingredients::actions::delete_ingredient(id, conn)))
            .await
    }

    pub async fn create_category(
        &self,
        input: CategoryInput,
    ) -> CatalogResult<MutationResult<CategoryId>> {
        self.transaction(move |conn| {
            let input = input.clone();
            Box::pin(async move { categories::actions::create_category(&input, conn).await })
        })
        .await
    }

    pub async fn update_category(
        &self,
        id: CategoryId,
        input: CategoryInput,
    ) -> CatalogResult<MutationResult<CategoryId>> {
        self.transaction(move |conn| {
            let input = input.clone();
            Box::pin(async move { categories::actions::update_category(id, &input, conn).await })
        })
        .await
    }

    pub async fn delete_category(&self, id: CategoryId) -> CatalogResult<MutationResult<CategoryId>> {
        self.transaction(move |conn| Box::pin(categories::actions::delete_category(id, conn)))
            .await
    }

    pub async fn create_dough(&self, input: DoughInput) -> CatalogResult<MutationResult<DoughId>> {
        self.transaction(move |conn| {
            let input = input.clone();
            Box::pin(async move { doughs::actions::create_dough(&input, conn).await })
        })
        .await
    }

    pub async fn update_dough(
        &self,
        id: DoughId,
        input: DoughInput,
    ) -> CatalogResult<MutationResult<DoughId>> {
        self.transaction(move |conn| {
            let input = input.clone();
            Box::pin(async move { doughs::actions::update_dough(id, &input, conn).await })
        })
        .await
    }

    pub async fn delete_dough(&self, id: DoughId) -> CatalogResult<MutationResult<DoughId>> {
        self.transaction(move |conn| Box::pin(doughs::actions::delete_dough(id, conn)))
            .await
    }

    pub async fn place_order(&self, request: OrderRequest) -> CatalogResult<MutationResult<PizzaId>> {
        self.transaction(move |conn| {
            Box::pin(async move { stock::place_order(&request, conn).await })
        })
        .await
    }

    pub async fn restock_ingredient(
        &self,
        request: RestockRequest<IngredientId>,
    ) -> CatalogResult<MutationResult<IngredientId>> {
        let stock_max = self.stock_max;
        self.transaction(move |conn| {
            Box::pin(async move { stock::restock_ingredient(&request, stock_max, conn).await })
        })
        .await
    }

    pub async fn restock_dough(
        &self,
        request: RestockRequest<DoughId>,
    ) -> CatalogResult<MutationResult<DoughId>> {
        let stock_max = self.stock_max;
        self.transaction(move |conn| {
            Box::pin(async move { stock::restock_dough(&request, stock_max, conn).await })
        })
        .await
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub async fn list_pizzas(&self) -> CatalogResult<Vec<PizzaBrief>> {
        pizzas::actions::list_pizzas_brief(&self.pool).await
    }

    pub async fn pizza(&self, id: PizzaId) -> CatalogResult<PizzaDetail> {
        pizzas::actions::get_pizza(id, &self.pool).await
    }

    pub async fn pizza_edit(&self, id: PizzaId) -> CatalogResult<PizzaEdit> {
        pizzas::actions::get_pizza_edit(id, &self.pool).await
    }

    /// Cost and availability of a pizza on every dough, for the order screen.
    pub async fn pizza_variants(&self, id: PizzaId) -> CatalogResult<Vec<DoughVariant>> {
        pizzas::actions::get_pizza_variants(id, &self.pool).await
    }

    pub async fn list_ingredients(&self) -> CatalogResult<Vec<IngredientBrief>> {
        ingredients::actions::list_ingredients_brief(&self.pool).await
    }

    pub async fn ingredient(&self, id: IngredientId) -> CatalogResult<IngredientDetail> {
        ingredients::actions::get_ingredient(id, &self.pool).await
    }

    pub async fn ingredient_edit(&self, id: IngredientId) -> CatalogResult<IngredientEdit> {
        ingredients::actions::get_ingredient_edit(id, &self.pool).await
    }

    pub async fn list_categories(&self) -> CatalogResult<Vec<CategoryBrief>> {
        categories::actions::list_categories_brief(&self.pool).await
    }

    pub async fn category(&self, id: CategoryId) -> CatalogResult<CategoryDetail> {
        categories::actions::get_category(id, &self.pool).await
    }

    pub async fn category_edit(&self, id: CategoryId) -> CatalogResult<CategoryEdit> {
        categories::actions::get_category_edit(id, &self.pool).await
    }

    pub async fn list_doughs(&self) -> CatalogResult<Vec<DoughBrief>> {
        doughs::actions::list_doughs_brief(&self.pool).await
    }

    pub async fn dough(&self, id: DoughId) -> CatalogResult<Dough> {
        doughs::actions::get_dough(id, &self.pool).await
    }

    pub async fn dough_edit(&self, id: DoughId) -> CatalogResult<DoughEdit> {
        doughs::actions::get_dough_edit(id, &self.pool).await
    }

    /// `(id, name, is_protected)` of every entity of one kind.
    pub async fn names<E: CatalogEntity>(&self) -> CatalogResult<Vec<EntityName<Id<E>>>> {
        lookups::list_names::<E>(&self.pool).await
    }

    /// Delete confirmation view; `None` when the entity does not exist.
    pub async fn delete_view<E: CatalogEntity>(
        &self,
        id: Id<E>,
    ) -> CatalogResult<Option<EntityName<Id<E>>>> {
        lookups::find_name(id, &self.pool).await
    }

    pub async fn is_protected<E: CatalogEntity>(&self, id: Id<E>) -> CatalogResult<Option<bool>> {
        lookups::is_protected(id, &self.pool).await
    }
}

fn widen<I: Into<EntityId>>(result: MutationResult<I>) -> MutationResult<EntityId> {
    MutationResult {
        id: result.id.into(),
        was_updated: result.was_updated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutation_request_is_tagged_by_kind() {
        let request: MutationRequest = serde_json::from_value(serde_json::json!({
            "kind": "category",
            "id": null,
            "input": {"name": "Bianche", "incompatible_ingredients": ["Pomodoro"]}
        }))
        .unwrap();

        match request {
            MutationRequest::Category { id, input } => {
                assert!(id.is_none());
                assert!(input.incompatible_ingredients.contains("Pomodoro"));
            }
            other => panic!("unexpected request: {:?}", other),
        }
    }

    #[test]
    fn widen_keeps_the_kind() {
        let result = widen(MutationResult {
            id: DoughId::new(2),
            was_updated: false,
        });
        assert_eq!(result.id, EntityId::Dough(DoughId::new(2)));
        assert!(!result.was_updated);
    }
}

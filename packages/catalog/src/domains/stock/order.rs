//! Placing an order: the only operation that consumes stock.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use tracing::{info, warn};

use super::aggregate::{availability, StockLevel};
use crate::common::{CatalogError, CatalogResult, CatalogTable, DoughId, IngredientId, PizzaId};
use crate::domains::doughs::models::Dough;
use crate::domains::ingredients::models::Ingredient;
use crate::domains::pizzas::models::Pizza;
use crate::domains::sync::MutationResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub pizza_id: PizzaId,
    pub dough_id: DoughId,
    pub units: NonZeroU32,
}

/// Take `units` of the dough and of every ingredient of the pizza.
///
/// Lock order is pizza (shared), dough, then ingredients by id. Availability is
/// re-checked under the locks and every decrement is conditional, so stock
/// never goes negative and two concurrent orders cannot both consume the
/// last units. Timestamps are left alone.
pub async fn place_order(
    request: &OrderRequest,
    conn: &mut PgConnection,
) -> CatalogResult<MutationResult<PizzaId>> {
    let requested = request.units.get();
    let units = i32::try_from(requested).unwrap_or(i32::MAX);

    Pizza::lock_shared(request.pizza_id, conn)
        .await?
        .ok_or_else(|| CatalogError::not_found(CatalogTable::Pizzas, request.pizza_id))?;
    let dough = Dough::lock(request.dough_id, conn)
        .await?
        .ok_or_else(|| CatalogError::not_found(CatalogTable::Doughs, request.dough_id))?;
    let ingredients = Ingredient::lock_for_pizza(request.pizza_id, conn).await?;

    let levels: Vec<StockLevel> = ingredients.iter().map(StockLevel::from).collect();
    let available = availability(&levels, StockLevel::from(&dough));
    if units > available {
        warn!(
            pizza_id = %request.pizza_id,
            dough_id = %request.dough_id,
            requested,
            available,
            "Order exceeds available stock"
        );
        return Err(CatalogError::InsufficientStock {
            requested,
            available,
        });
    }

    if !Dough::take_stock(dough.id, units, conn).await? {
        return Err(CatalogError::InsufficientStock {
            requested,
            available: dough.stock,
        });
    }

    let ingredient_ids: Vec<IngredientId> = ingredients.iter().map(|i| i.id).collect();
    let decremented = Ingredient::take_stock(&ingredient_ids, units, conn).await?;
    if decremented != ingredient_ids.len() as u64 {
        return Err(CatalogError::InsufficientStock {
            requested,
            available,
        });
    }

    info!(
        pizza_id = %request.pizza_id,
        dough_id = %request.dough_id,
        units = requested,
        "Order placed"
    );

    Ok(MutationResult {
        id: request.pizza_id,
        was_updated: true,
    })
}

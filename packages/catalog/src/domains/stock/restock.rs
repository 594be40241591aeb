use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use tracing::info;

use crate::common::{CatalogError, CatalogResult, CatalogTable, DoughId, IngredientId};
use crate::domains::doughs::models::Dough;
use crate::domains::ingredients::models::Ingredient;
use crate::domains::sync::MutationResult;

/// Units to add to an ingredient's or a dough's stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestockRequest<I> {
    pub id: I,
    pub units: NonZeroU32,
}

/// Reject a restock that would push the stock past `stock_max`.
fn check_limit(current: i32, units: NonZeroU32, stock_max: i32) -> CatalogResult<i32> {
    let target = i64::from(current) + i64::from(units.get());
    if target > i64::from(stock_max) {
        return Err(CatalogError::StockLimitExceeded {
            requested: units.get(),
            max: stock_max,
        });
    }
    // target <= stock_max, so both fit in i32
    Ok(units.get() as i32)
}

/// Restocking never bumps `updated_at`.
pub async fn restock_ingredient(
    request: &RestockRequest<IngredientId>,
    stock_max: i32,
    conn: &mut PgConnection,
) -> CatalogResult<MutationResult<IngredientId>> {
    let ingredient = Ingredient::lock(request.id, conn)
        .await?
        .ok_or_else(|| CatalogError::not_found(CatalogTable::Ingredients, request.id))?;

    let units = check_limit(ingredient.stock, request.units, stock_max)?;
    let stock = Ingredient::add_stock(request.id, units, conn).await?;

    info!(ingredient_id = %request.id, units, stock, "Ingredient restocked");
    Ok(MutationResult {
        id: request.id,
        was_updated: true,
    })
}

pub async fn restock_dough(
    request: &RestockRequest<DoughId>,
    stock_max: i32,
    conn: &mut PgConnection,
) -> CatalogResult<MutationResult<DoughId>> {
    let dough = Dough::lock(request.id, conn)
        .await?
        .ok_or_else(|| CatalogError::not_found(CatalogTable::Doughs, request.id))?;

    let units = check_limit(dough.stock, request.units, stock_max)?;
    let stock = Dough::add_stock(request.id, units, conn).await?;

    info!(dough_id = %request.id, units, stock, "Dough restocked");
    Ok(MutationResult {
        id: request.id,
        was_updated: true,
    })
}

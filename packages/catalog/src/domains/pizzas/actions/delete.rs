use sqlx::PgConnection;
use tracing::info;

use crate::common::{CatalogError, CatalogResult, CatalogTable, PizzaId};
use crate::domains::pizzas::models::Pizza;
use crate::domains::sync::MutationResult;
use crate::kernel::links::{PIZZA_CATEGORIES, PIZZA_INGREDIENTS};

/// Remove a pizza and its memberships. Categories and ingredients keep their
/// timestamps.
pub async fn delete_pizza(id: PizzaId, conn: &mut PgConnection) -> CatalogResult<MutationResult<PizzaId>> {
    Pizza::lock(id, conn)
        .await?
        .ok_or_else(|| CatalogError::not_found(CatalogTable::Pizzas, id))?;

    let categories = PIZZA_CATEGORIES.delete_all(id, conn).await?;
    let ingredients = PIZZA_INGREDIENTS.delete_all(id, conn).await?;
    Pizza::delete(id, conn).await?;

    info!(
        pizza_id = %id,
        categories = categories.len(),
        ingredients = ingredients.len(),
        "Pizza deleted"
    );

    Ok(MutationResult {
        id,
        was_updated: true,
    })
}

use sqlx::PgConnection;
use tracing::info;

use crate::common::{CatalogError, CatalogResult, CatalogTable, IngredientId};
use crate::domains::ingredients::models::Ingredient;
use crate::domains::sync::{BumpPlan, MutationResult};
use crate::kernel::links::{INGREDIENT_PIZZAS, INGREDIENT_RULES};

/// Remove an ingredient with its rules and memberships.
///
/// Losing the ingredient changes the categories it ruled on and the pizzas
/// that carried it, so those are bumped.
pub async fn delete_ingredient(
    id: IngredientId,
    conn: &mut PgConnection,
) -> CatalogResult<MutationResult<IngredientId>> {
    Ingredient::lock(id, conn)
        .await?
        .ok_or_else(|| CatalogError::not_found(CatalogTable::Ingredients, id))?;

    let categories = INGREDIENT_RULES.delete_all(id, conn).await?;
    let pizzas = INGREDIENT_PIZZAS.delete_all(id, conn).await?;
    Ingredient::delete(id, conn).await?;

    let bumps = BumpPlan {
        pizzas,
        categories,
        ..BumpPlan::default()
    };
    bumps.apply(conn).await?;

    info!(
        ingredient_id = %id,
        pizzas = bumps.pizzas.len(),
        categories = bumps.categories.len(),
        "Ingredient deleted"
    );

    Ok(MutationResult {
        id,
        was_updated: true,
    })
}

use sqlx::PgConnection;
use tracing::info;

use crate::common::{CatalogError, CatalogResult, CatalogTable, CategoryId};
use crate::domains::categories::models::Category;
use crate::domains::sync::{BumpPlan, MutationResult};
use crate::kernel::links::{CATEGORY_PIZZAS, CATEGORY_RULES};

/// Remove a category with its rules and assignments, bumping the ingredients
/// that ruled on it and the pizzas it was assigned to.
pub async fn delete_category(
    id: CategoryId,
    conn: &mut PgConnection,
) -> CatalogResult<MutationResult<CategoryId>> {
    Category::lock(id, conn)
        .await?
        .ok_or_else(|| CatalogError::not_found(CatalogTable::Categories, id))?;

    let ingredients = CATEGORY_RULES.delete_all(id, conn).await?;
    let pizzas = CATEGORY_PIZZAS.delete_all(id, conn).await?;
    Category::delete(id, conn).await?;

    let bumps = BumpPlan {
        pizzas,
        ingredients,
        ..BumpPlan::default()
    };
    bumps.apply(conn).await?;

    info!(
        category_id = %id,
        pizzas = bumps.pizzas.len(),
        ingredients = bumps.ingredients.len(),
        "Category deleted"
    );

    Ok(MutationResult {
        id,
        was_updated: true,
    })
}

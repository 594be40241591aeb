//! Create and update a pizza by reconciling its relation sets.

use std::collections::BTreeSet;

use sqlx::PgConnection;
use tracing::{debug, info};

use crate::common::{CatalogError, CatalogResult, CatalogTable, Category, Ingredient, PizzaId};
use crate::domains::pizzas::models::{Pizza, PizzaInput};
use crate::domains::sync::{BumpPlan, MutationResult, SyncOutcome};
use crate::kernel::diff::RelationDiff;
use crate::kernel::links::{PIZZA_CATEGORIES, PIZZA_INGREDIENTS};
use crate::kernel::name_resolver::resolve_ids;

/// Insert a pizza and link it to its categories and ingredients.
///
/// Neither side of a pizza's memberships is bumped, so creating a pizza only
/// writes rows.
pub async fn create_pizza(
    input: &PizzaInput,
    conn: &mut PgConnection,
) -> CatalogResult<MutationResult<PizzaId>> {
    let categories = resolve_ids::<Category>(&input.categories, conn).await?;
    let ingredients = resolve_ids::<Ingredient>(&input.ingredients, conn).await?;

    let id = Pizza::insert(input, conn).await?;

    let category_diff = RelationDiff::compute(&BTreeSet::new(), &categories);
    let ingredient_diff = RelationDiff::compute(&BTreeSet::new(), &ingredients);
    PIZZA_CATEGORIES.apply(id, &category_diff, conn).await?;
    PIZZA_INGREDIENTS.apply(id, &ingredient_diff, conn).await?;

    let outcome = SyncOutcome {
        id,
        scalars_written: true,
        relations_changed: !category_diff.is_empty() || !ingredient_diff.is_empty(),
        bumps: BumpPlan::for_pizza(id, true, &category_diff, &ingredient_diff).without(id),
    };
    let result = outcome.finish(conn).await?;

    info!(pizza_id = %id, name = %input.name, "Pizza created");
    Ok(result)
}

/// Bring a stored pizza to `input`, writing only what differs.
pub async fn update_pizza(
    id: PizzaId,
    input: &PizzaInput,
    conn: &mut PgConnection,
) -> CatalogResult<MutationResult<PizzaId>> {
    let stored = Pizza::lock(id, conn)
        .await?
        .ok_or_else(|| CatalogError::not_found(CatalogTable::Pizzas, id))?;
    let old_categories = PIZZA_CATEGORIES.lock(id, conn).await?;
    let old_ingredients = PIZZA_INGREDIENTS.lock(id, conn).await?;

    let categories = resolve_ids::<Category>(&input.categories, conn).await?;
    let ingredients = resolve_ids::<Ingredient>(&input.ingredients, conn).await?;

    let category_diff = RelationDiff::compute(&old_categories, &categories);
    let ingredient_diff = RelationDiff::compute(&old_ingredients, &ingredients);
    let content_changed = stored.content_differs(input);

    debug!(
        pizza_id = %id,
        content_changed,
        ?category_diff,
        ?ingredient_diff,
        "Computed pizza diff"
    );

    if content_changed {
        Pizza::update(id, input, conn).await?;
    }
    PIZZA_CATEGORIES.apply(id, &category_diff, conn).await?;
    PIZZA_INGREDIENTS.apply(id, &ingredient_diff, conn).await?;

    let outcome = SyncOutcome {
        id,
        scalars_written: content_changed,
        relations_changed: !category_diff.is_empty() || !ingredient_diff.is_empty(),
        bumps: BumpPlan::for_pizza(id, content_changed, &category_diff, &ingredient_diff),
    };
    let result = outcome.finish(conn).await?;

    if result.was_updated {
        info!(pizza_id = %id, "Pizza updated");
    }
    Ok(result)
}

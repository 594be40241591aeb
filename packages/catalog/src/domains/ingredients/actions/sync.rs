//! Create and update an ingredient: scalars, pizza memberships and category rules.

use std::collections::{BTreeMap, BTreeSet};

use sqlx::PgConnection;
use tracing::{debug, info};

use crate::common::{CatalogError, CatalogResult, CatalogTable, Category, IngredientId, Pizza};
use crate::domains::ingredients::models::{Ingredient, IngredientInput};
use crate::domains::sync::{BumpPlan, MutationResult, SyncOutcome};
use crate::kernel::diff::{RelationDiff, RuleDiff};
use crate::kernel::links::{INGREDIENT_PIZZAS, INGREDIENT_RULES};
use crate::kernel::name_resolver::resolve_ids;

/// Insert an ingredient with its rules and pizza memberships. The categories
/// it rules on and the pizzas it joins are bumped.
pub async fn create_ingredient(
    input: &IngredientInput,
    conn: &mut PgConnection,
) -> CatalogResult<MutationResult<IngredientId>> {
    let enforced = resolve_ids::<Category>(&input.enforced_categories, conn).await?;
    let incompatible = resolve_ids::<Category>(&input.incompatible_categories, conn).await?;
    let pizzas = resolve_ids::<Pizza>(&input.pizzas, conn).await?;

    let rule_diff = RuleDiff::compute(&BTreeMap::new(), &enforced, &incompatible)?;
    let pizza_diff = RelationDiff::compute(&BTreeSet::new(), &pizzas);

    let id = Ingredient::insert(input, conn).await?;
    INGREDIENT_RULES.apply(id, &rule_diff, conn).await?;
    INGREDIENT_PIZZAS.apply(id, &pizza_diff, conn).await?;

    let outcome = SyncOutcome {
        id,
        scalars_written: true,
        relations_changed: !rule_diff.is_empty() || !pizza_diff.is_empty(),
        bumps: BumpPlan::for_ingredient(id, true, &rule_diff, &pizza_diff).without(id),
    };
    let result = outcome.finish(conn).await?;

    info!(ingredient_id = %id, name = %input.name, "Ingredient created");
    Ok(result)
}

/// Bring a stored ingredient to `input`, writing only what differs.
///
/// A stock-only change is written but bumps nothing.
pub async fn update_ingredient(
    id: IngredientId,
    input: &IngredientInput,
    conn: &mut PgConnection,
) -> CatalogResult<MutationResult<IngredientId>> {
    let stored = Ingredient::lock(id, conn)
        .await?
        .ok_or_else(|| CatalogError::not_found(CatalogTable::Ingredients, id))?;
    let old_rules = INGREDIENT_RULES.lock(id, conn).await?;
    let old_pizzas = INGREDIENT_PIZZAS.lock(id, conn).await?;

    let enforced = resolve_ids::<Category>(&input.enforced_categories, conn).await?;
    let incompatible = resolve_ids::<Category>(&input.incompatible_categories, conn).await?;
    let pizzas = resolve_ids::<Pizza>(&input.pizzas, conn).await?;

    let rule_diff = RuleDiff::compute(&old_rules, &enforced, &incompatible)?;
    let pizza_diff = RelationDiff::compute(&old_pizzas, &pizzas);
    let content_changed = stored.content_differs(input);
    let stock_changed = stored.stock_differs(input);

    debug!(
        ingredient_id = %id,
        content_changed,
        stock_changed,
        ?rule_diff,
        ?pizza_diff,
        "Computed ingredient diff"
    );

    if content_changed || stock_changed {
        Ingredient::update(id, input, conn).await?;
    }
    INGREDIENT_RULES.apply(id, &rule_diff, conn).await?;
    INGREDIENT_PIZZAS.apply(id, &pizza_diff, conn).await?;

    let outcome = SyncOutcome {
        id,
        scalars_written: content_changed || stock_changed,
        relations_changed: !rule_diff.is_empty() || !pizza_diff.is_empty(),
        bumps: BumpPlan::for_ingredient(id, content_changed, &rule_diff, &pizza_diff),
    };
    let result = outcome.finish(conn).await?;

    if result.was_updated {
        info!(ingredient_id = %id, "Ingredient updated");
    }
    Ok(result)
}

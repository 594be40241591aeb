//! Create and update a category: scalars, pizza assignments and ingredient rules.

use std::collections::{BTreeMap, BTreeSet};

use sqlx::PgConnection;
use tracing::{debug, info};

use crate::common::{CatalogError, CatalogResult, CatalogTable, CategoryId, Ingredient, Pizza};
use crate::domains::categories::models::{Category, CategoryInput};
use crate::domains::sync::{BumpPlan, MutationResult, SyncOutcome};
use crate::kernel::diff::{RelationDiff, RuleDiff};
use crate::kernel::links::{CATEGORY_PIZZAS, CATEGORY_RULES};
use crate::kernel::name_resolver::resolve_ids;

pub async fn create_category(
    input: &CategoryInput,
    conn: &mut PgConnection,
) -> CatalogResult<MutationResult<CategoryId>> {
    let enforcing = resolve_ids::<Ingredient>(&input.enforcing_ingredients, conn).await?;
    let incompatible = resolve_ids::<Ingredient>(&input.incompatible_ingredients, conn).await?;
    let pizzas = resolve_ids::<Pizza>(&input.pizzas, conn).await?;

    let rule_diff = RuleDiff::compute(&BTreeMap::new(), &enforcing, &incompatible)?;
    let pizza_diff = RelationDiff::compute(&BTreeSet::new(), &pizzas);

    let id = Category::insert(input, conn).await?;
    CATEGORY_RULES.apply(id, &rule_diff, conn).await?;
    CATEGORY_PIZZAS.apply(id, &pizza_diff, conn).await?;

    let outcome = SyncOutcome {
        id,
        scalars_written: true,
        relations_changed: !rule_diff.is_empty() || !pizza_diff.is_empty(),
        bumps: BumpPlan::for_category(id, true, &rule_diff, &pizza_diff).without(id),
    };
    let result = outcome.finish(conn).await?;

    info!(category_id = %id, name = %input.name, "Category created");
    Ok(result)
}

/// Bring a stored category to `input`, writing only what differs.
pub async fn update_category(
    id: CategoryId,
    input: &CategoryInput,
    conn: &mut PgConnection,
) -> CatalogResult<MutationResult<CategoryId>> {
    let stored = Category::lock(id, conn)
        .await?
        .ok_or_else(|| CatalogError::not_found(CatalogTable::Categories, id))?;
    let old_rules = CATEGORY_RULES.lock(id, conn).await?;
    let old_pizzas = CATEGORY_PIZZAS.lock(id, conn).await?;

    let enforcing = resolve_ids::<Ingredient>(&input.enforcing_ingredients, conn).await?;
    let incompatible = resolve_ids::<Ingredient>(&input.incompatible_ingredients, conn).await?;
    let pizzas = resolve_ids::<Pizza>(&input.pizzas, conn).await?;

    let rule_diff = RuleDiff::compute(&old_rules, &enforcing, &incompatible)?;
    let pizza_diff = RelationDiff::compute(&old_pizzas, &pizzas);
    let content_changed = stored.content_differs(input);

    debug!(
        category_id = %id,
        content_changed,
        ?rule_diff,
        ?pizza_diff,
        "Computed category diff"
    );

    if content_changed {
        Category::update(id, input, conn).await?;
    }
    CATEGORY_RULES.apply(id, &rule_diff, conn).await?;
    CATEGORY_PIZZAS.apply(id, &pizza_diff, conn).await?;

    let outcome = SyncOutcome {
        id,
        scalars_written: content_changed,
        relations_changed: !rule_diff.is_empty() || !pizza_diff.is_empty(),
        bumps: BumpPlan::for_category(id, content_changed, &rule_diff, &pizza_diff),
    };
    let result = outcome.finish(conn).await?;

    if result.was_updated {
        info!(category_id = %id, "Category updated");
    }
    Ok(result)
}

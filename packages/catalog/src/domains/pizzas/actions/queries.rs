//! Read projections of pizzas. Unlocked; aggregates may be slightly stale.

use std::collections::{BTreeMap, BTreeSet};

use sqlx::PgPool;

use crate::common::{
    names_of, refs, CatalogError, CatalogResult, CatalogTable, Category, CategoryId, EntityRef,
    IngredientId, PizzaId,
};
use crate::domains::doughs::models::Dough;
use crate::domains::ingredients::models::Ingredient;
use crate::domains::pizzas::data::{PizzaBrief, PizzaDetail, PizzaEdit};
use crate::domains::pizzas::models::Pizza;
use crate::domains::rules::{
    derive_categories, PizzaCategoryRow, PizzaIngredientRow, RuleEdge, RuleIndex,
};
use crate::domains::stock::{self, DoughVariant, StockLevel};
use crate::kernel::lookups::name_index;

/// Every pizza with base-dough cost, availability and actual categories.
pub async fn list_pizzas_brief(pool: &PgPool) -> CatalogResult<Vec<PizzaBrief>> {
    let pizzas = Pizza::find_all(pool).await?;
    let ingredients: BTreeMap<IngredientId, Ingredient> = Ingredient::find_all(pool)
        .await?
        .into_iter()
        .map(|i| (i.id, i))
        .collect();
    let category_names = name_index::<Category>(pool).await?;
    let rules = RuleIndex::new(&RuleEdge::find_all(pool).await?);
    let base = StockLevel::from(&Dough::find_base(pool).await?);

    let mut ingredients_of: BTreeMap<PizzaId, BTreeSet<IngredientId>> = BTreeMap::new();
    for row in PizzaIngredientRow::find_all(pool).await? {
        ingredients_of.entry(row.pizza_id).or_default().insert(row.ingredient_id);
    }
    let mut categories_of: BTreeMap<PizzaId, BTreeSet<CategoryId>> = BTreeMap::new();
    for row in PizzaCategoryRow::find_all(pool).await? {
        categories_of.entry(row.pizza_id).or_default().insert(row.category_id);
    }

    let empty_ingredients = BTreeSet::new();
    let empty_categories = BTreeSet::new();

    Ok(pizzas
        .into_iter()
        .map(|pizza| {
            let own_ingredients = ingredients_of.get(&pizza.id).unwrap_or(&empty_ingredients);
            let assigned = categories_of.get(&pizza.id).unwrap_or(&empty_categories);
            let levels: Vec<StockLevel> = own_ingredients
                .iter()
                .filter_map(|id| ingredients.get(id))
                .map(StockLevel::from)
                .collect();
            let derived = rules.derive(assigned, own_ingredients);

            PizzaBrief {
                id: pizza.id,
                name: pizza.name,
                is_protected: pizza.is_protected,
                cost: stock::cost(&levels, base),
                availability: stock::availability(&levels, base),
                actual_categories: refs(&derived.actual, &category_names),
            }
        })
        .collect())
}

pub async fn get_pizza(id: PizzaId, pool: &PgPool) -> CatalogResult<PizzaDetail> {
    let pizza = Pizza::find_by_id(id, pool)
        .await?
        .ok_or_else(|| CatalogError::not_found(CatalogTable::Pizzas, id))?;

    let ingredients = Ingredient::find_for_pizza(id, pool).await?;
    let ingredient_ids: Vec<IngredientId> = ingredients.iter().map(|i| i.id).collect();
    let edges = RuleEdge::find_for_ingredients(&ingredient_ids, pool).await?;
    let assigned: BTreeSet<CategoryId> = PizzaCategoryRow::find_for_pizza(id, pool)
        .await?
        .into_iter()
        .map(|row| row.category_id)
        .collect();
    let category_names = name_index::<Category>(pool).await?;
    let doughs = Dough::find_all(pool).await?;

    let levels: Vec<StockLevel> = ingredients.iter().map(StockLevel::from).collect();
    let own_ingredients: BTreeSet<IngredientId> = ingredient_ids.iter().copied().collect();
    let derived = derive_categories(&assigned, &own_ingredients, &edges);
    let variants = stock::dough_variants(&levels, &doughs);
    let (cost, availability) = base_variant(&variants, &doughs)
        .map(|base| (base.cost, base.availability))?;

    Ok(PizzaDetail {
        id: pizza.id,
        name: pizza.name,
        is_protected: pizza.is_protected,
        notes: pizza.notes,
        created_at: pizza.created_at,
        updated_at: pizza.updated_at,
        ingredients: ingredients
            .into_iter()
            .map(|i| EntityRef { id: i.id, name: i.name })
            .collect(),
        cost,
        availability,
        categories: refs(&derived.assigned, &category_names),
        enforced_categories: refs(&derived.enforced, &category_names),
        incompatible_categories: refs(&derived.incompatible, &category_names),
        actual_categories: refs(&derived.actual, &category_names),
        variants,
    })
}

pub async fn get_pizza_edit(id: PizzaId, pool: &PgPool) -> CatalogResult<PizzaEdit> {
    let pizza = Pizza::find_by_id(id, pool)
        .await?
        .ok_or_else(|| CatalogError::not_found(CatalogTable::Pizzas, id))?;

    let assigned: BTreeSet<CategoryId> = PizzaCategoryRow::find_for_pizza(id, pool)
        .await?
        .into_iter()
        .map(|row| row.category_id)
        .collect();
    let category_names = name_index::<Category>(pool).await?;

    Ok(PizzaEdit {
        id: pizza.id,
        name: pizza.name,
        is_protected: pizza.is_protected,
        notes: pizza.notes,
        categories: names_of(&assigned, &category_names),
        ingredients: Ingredient::find_for_pizza(id, pool)
            .await?
            .into_iter()
            .map(|i| i.name)
            .collect(),
    })
}

/// The order screen: cost and availability of a pizza on every dough.
pub async fn get_pizza_variants(id: PizzaId, pool: &PgPool) -> CatalogResult<Vec<DoughVariant>> {
    Pizza::find_by_id(id, pool)
        .await?
        .ok_or_else(|| CatalogError::not_found(CatalogTable::Pizzas, id))?;

    let levels: Vec<StockLevel> = Ingredient::find_for_pizza(id, pool)
        .await?
        .iter()
        .map(StockLevel::from)
        .collect();

    Ok(stock::dough_variants(&levels, &Dough::find_all(pool).await?))
}

fn base_variant<'a>(variants: &'a [DoughVariant], doughs: &[Dough]) -> CatalogResult<&'a DoughVariant> {
    doughs
        .iter()
        .find(|d| d.is_base)
        .and_then(|base| variants.iter().find(|v| v.dough_id == base.id))
        .ok_or_else(|| CatalogError::InternalInconsistency("no base dough configured".into()))
}

use std::collections::BTreeSet;

use sqlx::PgPool;

use crate::common::{
    names_of, refs, CatalogError, CatalogResult, CatalogTable, Category as CategoryMarker,
    CategoryId, Ingredient, IngredientId, Pizza, PizzaId,
};
use crate::domains::categories::data::{CategoryBrief, CategoryDetail, CategoryEdit};
use crate::domains::categories::models::Category;
use crate::domains::rules::{
    derive_category_reach, rules_of_category, PizzaCategoryRow, PizzaIngredientRow, RuleEdge,
};
use crate::kernel::lookups::{list_names, name_index};

pub async fn list_categories_brief(pool: &PgPool) -> CatalogResult<Vec<CategoryBrief>> {
    list_names::<CategoryMarker>(pool).await
}

pub async fn get_category(id: CategoryId, pool: &PgPool) -> CatalogResult<CategoryDetail> {
    let category = Category::find_by_id(id, pool)
        .await?
        .ok_or_else(|| CatalogError::not_found(CatalogTable::Categories, id))?;

    let assigned = assigned_pizzas(id, pool).await?;
    let edges = RuleEdge::find_for_category(id, pool).await?;
    let ruled: Vec<IngredientId> = edges.iter().map(|e| e.ingredient_id).collect();
    let memberships: Vec<(PizzaId, IngredientId)> =
        PizzaIngredientRow::find_for_ingredients(&ruled, pool)
            .await?
            .into_iter()
            .map(|row| (row.pizza_id, row.ingredient_id))
            .collect();

    let reach = derive_category_reach(id, &assigned, &memberships, &edges);
    let rules = rules_of_category(id, &edges);
    let pizza_names = name_index::<Pizza>(pool).await?;
    let ingredient_names = name_index::<Ingredient>(pool).await?;

    Ok(CategoryDetail {
        id: category.id,
        name: category.name,
        is_protected: category.is_protected,
        notes: category.notes,
        created_at: category.created_at,
        updated_at: category.updated_at,
        pizzas: refs(&reach.assigned_pizzas, &pizza_names),
        enforced_in_pizzas: refs(&reach.enforced_in, &pizza_names),
        incompatible_with_pizzas: refs(&reach.incompatible_with, &pizza_names),
        actual_for_pizzas: refs(&reach.actual_for, &pizza_names),
        enforcing_ingredients: refs(&rules.enforcing_ingredients, &ingredient_names),
        incompatible_ingredients: refs(&rules.incompatible_ingredients, &ingredient_names),
    })
}

pub async fn get_category_edit(id: CategoryId, pool: &PgPool) -> CatalogResult<CategoryEdit> {
    let category = Category::find_by_id(id, pool)
        .await?
        .ok_or_else(|| CatalogError::not_found(CatalogTable::Categories, id))?;

    let assigned = assigned_pizzas(id, pool).await?;
    let rules = rules_of_category(id, &RuleEdge::find_for_category(id, pool).await?);
    let pizza_names = name_index::<Pizza>(pool).await?;
    let ingredient_names = name_index::<Ingredient>(pool).await?;

    Ok(CategoryEdit {
        id: category.id,
        name: category.name,
        is_protected: category.is_protected,
        notes: category.notes,
        pizzas: names_of(&assigned, &pizza_names),
        enforcing_ingredients: names_of(&rules.enforcing_ingredients, &ingredient_names),
        incompatible_ingredients: names_of(&rules.incompatible_ingredients, &ingredient_names),
    })
}

async fn assigned_pizzas(id: CategoryId, pool: &PgPool) -> CatalogResult<BTreeSet<PizzaId>> {
    Ok(PizzaCategoryRow::find_for_category(id, pool)
        .await?
        .into_iter()
        .map(|row| row.pizza_id)
        .collect())
}

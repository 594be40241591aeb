use std::collections::BTreeSet;

use sqlx::PgPool;

use crate::common::{
    names_of, refs, CatalogError, CatalogResult, CatalogTable, Category, IngredientId, Pizza,
    PizzaId,
};
use crate::domains::ingredients::data::{IngredientBrief, IngredientDetail, IngredientEdit};
use crate::domains::ingredients::models::Ingredient;
use crate::domains::rules::{rules_of_ingredient, PizzaIngredientRow, RuleEdge};
use crate::kernel::lookups::name_index;

pub async fn list_ingredients_brief(pool: &PgPool) -> CatalogResult<Vec<IngredientBrief>> {
    Ok(Ingredient::find_all(pool)
        .await?
        .into_iter()
        .map(IngredientBrief::from)
        .collect())
}

pub async fn get_ingredient(id: IngredientId, pool: &PgPool) -> CatalogResult<IngredientDetail> {
    let ingredient = Ingredient::find_by_id(id, pool)
        .await?
        .ok_or_else(|| CatalogError::not_found(CatalogTable::Ingredients, id))?;

    let pizzas = pizzas_of(id, pool).await?;
    let rules = rules_of_ingredient(id, &RuleEdge::find_for_ingredients(&[id], pool).await?);
    let pizza_names = name_index::<Pizza>(pool).await?;
    let category_names = name_index::<Category>(pool).await?;

    Ok(IngredientDetail {
        id: ingredient.id,
        name: ingredient.name,
        is_protected: ingredient.is_protected,
        notes: ingredient.notes,
        price: ingredient.price,
        stock: ingredient.stock,
        created_at: ingredient.created_at,
        updated_at: ingredient.updated_at,
        pizzas: refs(&pizzas, &pizza_names),
        enforced_categories: refs(&rules.enforced_categories, &category_names),
        incompatible_categories: refs(&rules.incompatible_categories, &category_names),
    })
}

pub async fn get_ingredient_edit(id: IngredientId, pool: &PgPool) -> CatalogResult<IngredientEdit> {
    let ingredient = Ingredient::find_by_id(id, pool)
        .await?
        .ok_or_else(|| CatalogError::not_found(CatalogTable::Ingredients, id))?;

    let pizzas = pizzas_of(id, pool).await?;
    let rules = rules_of_ingredient(id, &RuleEdge::find_for_ingredients(&[id], pool).await?);
    let pizza_names = name_index::<Pizza>(pool).await?;
    let category_names = name_index::<Category>(pool).await?;

    Ok(IngredientEdit {
        id: ingredient.id,
        name: ingredient.name,
        is_protected: ingredient.is_protected,
        notes: ingredient.notes,
        price: ingredient.price,
        stock: ingredient.stock,
        pizzas: names_of(&pizzas, &pizza_names),
        enforced_categories: names_of(&rules.enforced_categories, &category_names),
        incompatible_categories: names_of(&rules.incompatible_categories, &category_names),
    })
}

async fn pizzas_of(id: IngredientId, pool: &PgPool) -> CatalogResult<BTreeSet<PizzaId>> {
    Ok(PizzaIngredientRow::find_for_ingredients(&[id], pool)
        .await?
        .into_iter()
        .map(|row| row.pizza_id)
        .collect())
}

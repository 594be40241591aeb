//! Test fixtures for creating catalog data.
//!
//! Every fixture goes through the public `Catalog` operations so that the
//! created rows look exactly like production ones (`updated_at` still NULL).

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU32, Ordering};

use anyhow::Result;
use catalog_core::common::{CategoryId, DoughId, IngredientId, PizzaId};
use catalog_core::domains::categories::CategoryInput;
use catalog_core::domains::doughs::DoughInput;
use catalog_core::domains::ingredients::IngredientInput;
use catalog_core::domains::pizzas::PizzaInput;
use catalog_core::Catalog;
use rust_decimal::Decimal;

static NAME_SEQ: AtomicU32 = AtomicU32::new(1);

/// Append a per-binary sequence number; tests share one database.
///
/// Leaked so names can sit in the `&[&str]` relation lists fixtures take.
pub fn unique(base: &str) -> &'static str {
    let name = format!("{} #{}", base, NAME_SEQ.fetch_add(1, Ordering::Relaxed));
    Box::leak(name.into_boxed_str())
}

pub fn names(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Price from cents, e.g. `cents(150)` is 1.50.
pub fn cents(value: i64) -> Decimal {
    Decimal::new(value, 2)
}

pub async fn create_test_category(catalog: &Catalog, name: &str) -> Result<CategoryId> {
    let result = catalog
        .create_category(CategoryInput::builder().name(name).build())
        .await?;
    Ok(result.id)
}

pub async fn create_test_ingredient(
    catalog: &Catalog,
    name: &str,
    price: Decimal,
    stock: i32,
) -> Result<IngredientId> {
    let result = catalog
        .create_ingredient(
            IngredientInput::builder()
                .name(name)
                .price(price)
                .stock(stock)
                .build(),
        )
        .await?;
    Ok(result.id)
}

pub async fn create_test_pizza(
    catalog: &Catalog,
    name: &str,
    ingredients: &[&str],
    categories: &[&str],
) -> Result<PizzaId> {
    let result = catalog
        .create_pizza(pizza_input(name, ingredients, categories))
        .await?;
    Ok(result.id)
}

pub async fn create_test_dough(
    catalog: &Catalog,
    name: &str,
    price: Decimal,
    stock: i32,
) -> Result<DoughId> {
    let result = catalog
        .create_dough(
            DoughInput::builder()
                .name(name)
                .price(price)
                .stock(stock)
                .build(),
        )
        .await?;
    Ok(result.id)
}

pub fn pizza_input(name: &str, ingredients: &[&str], categories: &[&str]) -> PizzaInput {
    PizzaInput::builder()
        .name(name)
        .ingredients(names(ingredients))
        .categories(names(categories))
        .build()
}

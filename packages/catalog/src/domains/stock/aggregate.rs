//! Cost and availability of a pizza on a dough.
//!
//! ```text
//! cost(P, dough)         = Σ price(i) for i in Ing(P) + price(dough)
//! availability(P, dough) = min(stock(dough), min(stock(i) for i in Ing(P)))
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::DoughId;
use crate::domains::doughs::models::Dough;
use crate::domains::ingredients::models::Ingredient;

/// Price and stock of one ingredient or dough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockLevel {
    pub price: Decimal,
    pub stock: i32,
}

impl From<&Ingredient> for StockLevel {
    fn from(ingredient: &Ingredient) -> Self {
        Self {
            price: ingredient.price,
            stock: ingredient.stock,
        }
    }
}

impl From<&Dough> for StockLevel {
    fn from(dough: &Dough) -> Self {
        Self {
            price: dough.price,
            stock: dough.stock,
        }
    }
}

/// One row of the order screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoughVariant {
    pub dough_id: DoughId,
    pub dough_name: String,
    pub cost: Decimal,
    pub availability: i32,
}

pub fn cost(ingredients: &[StockLevel], dough: StockLevel) -> Decimal {
    ingredients.iter().map(|i| i.price).sum::<Decimal>() + dough.price
}

/// Units that can be made; a pizza without ingredients is bounded by the dough alone.
pub fn availability(ingredients: &[StockLevel], dough: StockLevel) -> i32 {
    ingredients
        .iter()
        .map(|i| i.stock)
        .fold(dough.stock, i32::min)
}

/// Cost and availability on every dough, ordered by dough id.
pub fn dough_variants(ingredients: &[StockLevel], doughs: &[Dough]) -> Vec<DoughVariant> {
    let mut variants: Vec<DoughVariant> = doughs
        .iter()
        .map(|dough| {
            let level = StockLevel::from(dough);
            DoughVariant {
                dough_id: dough.id,
                dough_name: dough.name.clone(),
                cost: cost(ingredients, level),
                availability: availability(ingredients, level),
            }
        })
        .collect();

    variants.sort_by_key(|v| v.dough_id);
    variants
}

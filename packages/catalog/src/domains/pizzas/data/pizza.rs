use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::{CategoryId, EntityRef, IngredientId, PizzaId};
use crate::domains::pizzas::models::PizzaInput;
use crate::domains::stock::DoughVariant;

/// Pizza list entry, priced on the base dough.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PizzaBrief {
    pub id: PizzaId,
    pub name: String,
    pub is_protected: bool,
    pub cost: Decimal,
    pub availability: i32,
    pub actual_categories: Vec<EntityRef<CategoryId>>,
}

/// Full pizza view with derived categories and every dough variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PizzaDetail {
    pub id: PizzaId,
    pub name: String,
    pub is_protected: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub ingredients: Vec<EntityRef<IngredientId>>,
    /// Cost on the base dough
    pub cost: Decimal,
    /// Availability on the base dough
    pub availability: i32,
    /// Directly assigned categories
    pub categories: Vec<EntityRef<CategoryId>>,
    pub enforced_categories: Vec<EntityRef<CategoryId>>,
    pub incompatible_categories: Vec<EntityRef<CategoryId>>,
    pub actual_categories: Vec<EntityRef<CategoryId>>,
    pub variants: Vec<DoughVariant>,
}

/// Edit form of a pizza; relations by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PizzaEdit {
    pub id: PizzaId,
    pub name: String,
    pub is_protected: bool,
    pub notes: Option<String>,
    pub categories: BTreeSet<String>,
    pub ingredients: BTreeSet<String>,
}

impl From<PizzaEdit> for PizzaInput {
    fn from(edit: PizzaEdit) -> Self {
        Self {
            name: edit.name,
            is_protected: edit.is_protected,
            notes: edit.notes,
            categories: edit.categories,
            ingredients: edit.ingredients,
        }
    }
}

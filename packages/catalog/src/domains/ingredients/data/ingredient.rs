use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::{CategoryId, EntityRef, IngredientId, PizzaId};
use crate::domains::ingredients::models::{Ingredient, IngredientInput};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientBrief {
    pub id: IngredientId,
    pub name: String,
    pub is_protected: bool,
    pub price: Decimal,
    pub stock: i32,
}

impl From<Ingredient> for IngredientBrief {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name,
            is_protected: ingredient.is_protected,
            price: ingredient.price,
            stock: ingredient.stock,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientDetail {
    pub id: IngredientId,
    pub name: String,
    pub is_protected: bool,
    pub notes: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub pizzas: Vec<EntityRef<PizzaId>>,
    pub enforced_categories: Vec<EntityRef<CategoryId>>,
    pub incompatible_categories: Vec<EntityRef<CategoryId>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientEdit {
    pub id: IngredientId,
    pub name: String,
    pub is_protected: bool,
    pub notes: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub pizzas: BTreeSet<String>,
    pub enforced_categories: BTreeSet<String>,
    pub incompatible_categories: BTreeSet<String>,
}

impl From<IngredientEdit> for IngredientInput {
    fn from(edit: IngredientEdit) -> Self {
        Self {
            name: edit.name,
            is_protected: edit.is_protected,
            notes: edit.notes,
            price: edit.price,
            stock: edit.stock,
            pizzas: edit.pizzas,
            enforced_categories: edit.enforced_categories,
            incompatible_categories: edit.incompatible_categories,
        }
    }
}

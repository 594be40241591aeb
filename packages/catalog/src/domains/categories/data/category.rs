use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{CategoryId, EntityName, EntityRef, IngredientId, PizzaId};
use crate::domains::categories::models::CategoryInput;

/// Categories carry no aggregates, so their list entry is the name entry.
pub type CategoryBrief = EntityName<CategoryId>;

/// Full category view: its rules and how it lands on every pizza.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDetail {
    pub id: CategoryId,
    pub name: String,
    pub is_protected: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Pizzas the category is directly assigned to
    pub pizzas: Vec<EntityRef<PizzaId>>,
    pub enforced_in_pizzas: Vec<EntityRef<PizzaId>>,
    pub incompatible_with_pizzas: Vec<EntityRef<PizzaId>>,
    pub actual_for_pizzas: Vec<EntityRef<PizzaId>>,
    pub enforcing_ingredients: Vec<EntityRef<IngredientId>>,
    pub incompatible_ingredients: Vec<EntityRef<IngredientId>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEdit {
    pub id: CategoryId,
    pub name: String,
    pub is_protected: bool,
    pub notes: Option<String>,
    pub pizzas: BTreeSet<String>,
    pub enforcing_ingredients: BTreeSet<String>,
    pub incompatible_ingredients: BTreeSet<String>,
}

impl From<CategoryEdit> for CategoryInput {
    fn from(edit: CategoryEdit) -> Self {
        Self {
            name: edit.name,
            is_protected: edit.is_protected,
            notes: edit.notes,
            pizzas: edit.pizzas,
            enforcing_ingredients: edit.enforcing_ingredients,
            incompatible_ingredients: edit.incompatible_ingredients,
        }
    }
}

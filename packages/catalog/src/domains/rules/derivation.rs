//! Read-time derivation of category membership.
//!
//! ```text
//! Enforced(P)         = { c : some ingredient of P enforces c }
//! Incompatible(P)     = { c : some ingredient of P is incompatible with c }
//! ActualCategories(P) = (Assigned(P) ∪ Enforced(P)) \ Incompatible(P)
//! ```
//!
//! Everything here is pure and returns id-ordered sets, so callers get the
//! same output for the same stored rows regardless of query order.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::models::{RuleEdge, RuleType};
use crate::common::{CategoryId, IngredientId, PizzaId};

/// The category picture of one pizza.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryDerivation {
    pub assigned: BTreeSet<CategoryId>,
    pub enforced: BTreeSet<CategoryId>,
    pub incompatible: BTreeSet<CategoryId>,
    pub actual: BTreeSet<CategoryId>,
}

/// How one category relates to the pizzas of the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryReach {
    pub assigned_pizzas: BTreeSet<PizzaId>,
    pub enforced_in: BTreeSet<PizzaId>,
    pub incompatible_with: BTreeSet<PizzaId>,
    pub actual_for: BTreeSet<PizzaId>,
}

/// Rules of a single ingredient split by type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngredientRules {
    pub enforced_categories: BTreeSet<CategoryId>,
    pub incompatible_categories: BTreeSet<CategoryId>,
}

/// Rules pointing at a single category split by type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryRules {
    pub enforcing_ingredients: BTreeSet<IngredientId>,
    pub incompatible_ingredients: BTreeSet<IngredientId>,
}

/// Rule edges indexed by ingredient for repeated derivations.
#[derive(Debug, Clone, Default)]
pub struct RuleIndex {
    by_ingredient: BTreeMap<IngredientId, Vec<(CategoryId, RuleType)>>,
}

impl RuleIndex {
    pub fn new(edges: &[RuleEdge]) -> Self {
        let mut by_ingredient: BTreeMap<IngredientId, Vec<(CategoryId, RuleType)>> =
            BTreeMap::new();
        for edge in edges {
            by_ingredient
                .entry(edge.ingredient_id)
                .or_default()
                .push((edge.category_id, edge.rule_type));
        }
        Self { by_ingredient }
    }

    /// Derive the actual categories of a pizza.
    pub fn derive(
        &self,
        assigned: &BTreeSet<CategoryId>,
        ingredients: &BTreeSet<IngredientId>,
    ) -> CategoryDerivation {
        let mut enforced = BTreeSet::new();
        let mut incompatible = BTreeSet::new();

        for ingredient in ingredients {
            for (category, rule) in self.by_ingredient.get(ingredient).into_iter().flatten() {
                match rule {
                    RuleType::Enforcing => enforced.insert(*category),
                    RuleType::Incompatible => incompatible.insert(*category),
                };
            }
        }

        let actual = assigned
            .union(&enforced)
            .filter(|c| !incompatible.contains(c))
            .copied()
            .collect();

        CategoryDerivation {
            assigned: assigned.clone(),
            enforced,
            incompatible,
            actual,
        }
    }
}

/// Derive the actual categories of a pizza from its raw relations.
pub fn derive_categories(
    assigned: &BTreeSet<CategoryId>,
    ingredients: &BTreeSet<IngredientId>,
    edges: &[RuleEdge],
) -> CategoryDerivation {
    RuleIndex::new(edges).derive(assigned, ingredients)
}

/// Same formula as [`derive_categories`], restricted to one category and
/// evaluated for every pizza at once.
///
/// `memberships` must contain the (pizza, ingredient) rows of the ingredients
/// that have a rule on `category`; other rows are ignored.
pub fn derive_category_reach(
    category: CategoryId,
    assigned_pizzas: &BTreeSet<PizzaId>,
    memberships: &[(PizzaId, IngredientId)],
    edges: &[RuleEdge],
) -> CategoryReach {
    let rule_of: BTreeMap<IngredientId, RuleType> = edges
        .iter()
        .filter(|e| e.category_id == category)
        .map(|e| (e.ingredient_id, e.rule_type))
        .collect();

    let mut enforced_in = BTreeSet::new();
    let mut incompatible_with = BTreeSet::new();

    for (pizza, ingredient) in memberships {
        match rule_of.get(ingredient) {
            Some(RuleType::Enforcing) => enforced_in.insert(*pizza),
            Some(RuleType::Incompatible) => incompatible_with.insert(*pizza),
            None => false,
        };
    }

    let actual_for = assigned_pizzas
        .union(&enforced_in)
        .filter(|p| !incompatible_with.contains(p))
        .copied()
        .collect();

    CategoryReach {
        assigned_pizzas: assigned_pizzas.clone(),
        enforced_in,
        incompatible_with,
        actual_for,
    }
}

pub fn rules_of_ingredient(ingredient: IngredientId, edges: &[RuleEdge]) -> IngredientRules {
    let mut rules = IngredientRules::default();
    for edge in edges.iter().filter(|e| e.ingredient_id == ingredient) {
        match edge.rule_type {
            RuleType::Enforcing => rules.enforced_categories.insert(edge.category_id),
            RuleType::Incompatible => rules.incompatible_categories.insert(edge.category_id),
        };
    }
    rules
}

pub fn rules_of_category(category: CategoryId, edges: &[RuleEdge]) -> CategoryRules {
    let mut rules = CategoryRules::default();
    for edge in edges.iter().filter(|e| e.category_id == category) {
        match edge.rule_type {
            RuleType::Enforcing => rules.enforcing_ingredients.insert(edge.ingredient_id),
            RuleType::Incompatible => rules.incompatible_ingredients.insert(edge.ingredient_id),
        };
    }
    rules
}

pub mod derivation;
pub mod models;

// Re-export commonly used types
pub use derivation::{
    derive_categories, derive_category_reach, rules_of_category, rules_of_ingredient,
    CategoryDerivation, CategoryReach, CategoryRules, IngredientRules, RuleIndex,
};
pub use models::{PizzaCategoryRow, PizzaIngredientRow, RuleEdge, RuleType};

pub mod actions;
pub mod data;
pub mod models;

// Re-export commonly used types
pub use data::{IngredientBrief, IngredientDetail, IngredientEdit};
pub use models::{Ingredient, IngredientInput};

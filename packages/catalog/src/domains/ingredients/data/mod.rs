pub mod ingredient;

pub use ingredient::{IngredientBrief, IngredientDetail, IngredientEdit};

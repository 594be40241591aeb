mod delete;
mod queries;
mod sync;

pub use delete::delete_ingredient;
pub use queries::{get_ingredient, get_ingredient_edit, list_ingredients_brief};
pub use sync::{create_ingredient, update_ingredient};

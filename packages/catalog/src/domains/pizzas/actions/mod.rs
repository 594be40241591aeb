//! Pizza actions: diff-sync mutations run inside a catalog transaction, and
//! unlocked read projections.

mod delete;
mod queries;
mod sync;

pub use delete::delete_pizza;
pub use queries::{get_pizza, get_pizza_edit, get_pizza_variants, list_pizzas_brief};
pub use sync::{create_pizza, update_pizza};

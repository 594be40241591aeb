mod delete;
mod queries;
mod sync;

pub use delete::delete_category;
pub use queries::{get_category, get_category_edit, list_categories_brief};
pub use sync::{create_category, update_category};

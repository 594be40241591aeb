mod delete;
mod queries;
mod sync;

pub use delete::delete_dough;
pub use queries::{get_dough, get_dough_edit, list_doughs_brief};
pub use sync::{create_dough, update_dough};

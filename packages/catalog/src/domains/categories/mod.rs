pub mod actions;
pub mod data;
pub mod models;

// Re-export commonly used types
pub use data::{CategoryBrief, CategoryDetail, CategoryEdit};
pub use models::{Category, CategoryInput};

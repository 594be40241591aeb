pub mod actions;
pub mod data;
pub mod models;

// Re-export commonly used types
pub use data::{DoughBrief, DoughEdit};
pub use models::{Dough, DoughInput};

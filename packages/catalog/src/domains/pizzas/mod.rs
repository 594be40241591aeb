pub mod actions;
pub mod data;
pub mod models;

// Re-export commonly used types
pub use data::{PizzaBrief, PizzaDetail, PizzaEdit};
pub use models::{Pizza, PizzaInput};

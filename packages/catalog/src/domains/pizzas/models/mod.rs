pub mod pizza;

pub use pizza::{Pizza, PizzaInput};

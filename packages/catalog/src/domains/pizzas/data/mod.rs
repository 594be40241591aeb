pub mod pizza;

pub use pizza::{PizzaBrief, PizzaDetail, PizzaEdit};

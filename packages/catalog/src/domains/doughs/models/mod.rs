pub mod dough;

pub use dough::{Dough, DoughInput};

pub mod dough;

pub use dough::{DoughBrief, DoughEdit};

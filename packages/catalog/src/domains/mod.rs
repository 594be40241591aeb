// Catalog domains
pub mod categories;
pub mod doughs;
pub mod ingredients;
pub mod pizzas;
pub mod rules;
pub mod stock;
pub mod sync;

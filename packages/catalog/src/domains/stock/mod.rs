//! Stock and price aggregation, order placement and restocking.

pub mod aggregate;
pub mod order;
pub mod restock;

pub use aggregate::{availability, cost, dough_variants, DoughVariant, StockLevel};
pub use order::{place_order, OrderRequest};
pub use restock::{restock_dough, restock_ingredient, RestockRequest};

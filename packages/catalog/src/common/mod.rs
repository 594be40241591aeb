// Common types and utilities shared across the catalog

pub mod entity_ids;
pub mod errors;
pub mod id;
pub mod types;

pub use entity_ids::*;
pub use errors::{CatalogError, CatalogResult};
pub use id::Id;
pub use types::{names_of, refs, EntityName, EntityRef};

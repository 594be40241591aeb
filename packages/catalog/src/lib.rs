// Pizza Catalog - Core
//
// Relational consistency engine for a pizza catalog: rule-based category
// derivation, diff-sync updates of relation sets under row locks, timestamp
// propagation, and stock/cost aggregation with transactional orders.
//
// Business logic lives per entity in domains/*; transaction plumbing and
// relation-table primitives in kernel/.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;

pub use config::*;
pub use kernel::{Catalog, MutationRequest};

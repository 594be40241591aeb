//! Kernel module - transaction plumbing and the relation-table primitives the
//! domains build on.

pub mod catalog;
pub mod diff;
pub mod links;
pub mod lookups;
pub mod name_resolver;
pub mod transaction;

pub use catalog::{Catalog, MutationRequest};
pub use diff::{RelationDiff, RuleDiff};
pub use name_resolver::resolve_ids;
pub use transaction::{with_transaction, TransactionPolicy};

//! Shared plumbing of the diff-sync mutations: outcomes and timestamp propagation.

pub mod outcome;
pub mod propagation;

pub use outcome::{MutationResult, SyncOutcome};
pub use propagation::BumpPlan;

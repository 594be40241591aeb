use serde::{Deserialize, Serialize};
use sqlx::PgConnection;

use super::propagation::BumpPlan;
use crate::common::CatalogResult;

/// What a create, update or delete reports back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationResult<I> {
    pub id: I,
    /// False when the desired state equalled the stored state
    pub was_updated: bool,
}

/// Result of one sync step, before timestamps are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome<I> {
    pub id: I,
    /// Any scalar column was written, stock included
    pub scalars_written: bool,
    /// Any relation row was inserted or deleted
    pub relations_changed: bool,
    pub bumps: BumpPlan,
}

impl<I: Copy> SyncOutcome<I> {
    pub fn was_updated(&self) -> bool {
        self.scalars_written || self.relations_changed || !self.bumps.is_empty()
    }

    /// Write the planned timestamp bumps and turn the outcome into a result.
    pub async fn finish(self, conn: &mut PgConnection) -> CatalogResult<MutationResult<I>> {
        self.bumps.apply(conn).await?;
        Ok(MutationResult {
            id: self.id,
            was_updated: self.was_updated(),
        })
    }
}

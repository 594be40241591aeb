use sqlx::PgConnection;
use tracing::{debug, info};

use crate::common::{CatalogError, CatalogResult, CatalogTable, DoughId};
use crate::domains::doughs::models::{Dough, DoughInput};
use crate::domains::sync::{BumpPlan, MutationResult, SyncOutcome};

pub async fn create_dough(
    input: &DoughInput,
    conn: &mut PgConnection,
) -> CatalogResult<MutationResult<DoughId>> {
    let id = Dough::insert(input, conn).await?;

    info!(dough_id = %id, name = %input.name, "Dough created");
    Ok(MutationResult {
        id,
        was_updated: true,
    })
}

/// Doughs have no relations; only scalars are reconciled.
pub async fn update_dough(
    id: DoughId,
    input: &DoughInput,
    conn: &mut PgConnection,
) -> CatalogResult<MutationResult<DoughId>> {
    let stored = Dough::lock(id, conn)
        .await?
        .ok_or_else(|| CatalogError::not_found(CatalogTable::Doughs, id))?;

    let content_changed = stored.content_differs(input);
    let stock_changed = stored.stock_differs(input);
    debug!(dough_id = %id, content_changed, stock_changed, "Computed dough diff");

    if content_changed || stock_changed {
        Dough::update(id, input, conn).await?;
    }

    let outcome = SyncOutcome {
        id,
        scalars_written: content_changed || stock_changed,
        relations_changed: false,
        bumps: BumpPlan::for_dough(id, content_changed),
    };
    let result = outcome.finish(conn).await?;

    if result.was_updated {
        info!(dough_id = %id, "Dough updated");
    }
    Ok(result)
}

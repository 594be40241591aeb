use sqlx::PgConnection;
use tracing::{info, warn};

use crate::common::{CatalogError, CatalogResult, CatalogTable, DoughId};
use crate::domains::doughs::models::Dough;
use crate::domains::sync::MutationResult;

/// Remove a dough. The base dough prices every pizza listing and cannot go.
pub async fn delete_dough(id: DoughId, conn: &mut PgConnection) -> CatalogResult<MutationResult<DoughId>> {
    let dough = Dough::lock(id, conn)
        .await?
        .ok_or_else(|| CatalogError::not_found(CatalogTable::Doughs, id))?;

    if dough.is_base {
        warn!(dough_id = %id, "Refusing to delete the base dough");
        return Err(CatalogError::Forbidden(format!(
            "{} is the base dough and cannot be deleted",
            dough.name
        )));
    }

    Dough::delete(id, conn).await?;

    info!(dough_id = %id, "Dough deleted");
    Ok(MutationResult {
        id,
        was_updated: true,
    })
}

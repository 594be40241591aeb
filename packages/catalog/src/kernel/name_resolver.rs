//! Batch translation of entity names to ids.
//!
//! Callers hand the core names that were already checked for existence, so a
//! name that fails to resolve means the upstream contract was broken. That is
//! reported as `InternalInconsistency` and fails the surrounding transaction
//! instead of silently shrinking the relation set.

use std::collections::BTreeSet;

use sqlx::PgConnection;
use tracing::error;

use crate::common::{CatalogEntity, CatalogError, CatalogResult, Id};

/// Resolve `names` to ids of entity `E` with a single query.
pub async fn resolve_ids<E: CatalogEntity>(
    names: &BTreeSet<String>,
    conn: &mut PgConnection,
) -> CatalogResult<BTreeSet<Id<E>>> {
    if names.is_empty() {
        return Ok(BTreeSet::new());
    }

    let rows = sqlx::query_as::<_, (Id<E>, String)>(&format!(
        "SELECT id, name FROM {} WHERE name = ANY($1::text[])",
        E::TABLE.table_name()
    ))
    .bind(names.iter().cloned().collect::<Vec<_>>())
    .fetch_all(conn)
    .await?;

    if rows.len() != names.len() {
        let found: BTreeSet<&str> = rows.iter().map(|(_, name)| name.as_str()).collect();
        let missing = unresolved(names, &found);
        error!(
            table = E::TABLE.table_name(),
            missing = ?missing,
            "Relation names failed to resolve"
        );
        return Err(CatalogError::InternalInconsistency(format!(
            "unknown {} names: {}",
            E::TABLE,
            missing.join(", ")
        )));
    }

    Ok(rows.into_iter().map(|(id, _)| id).collect())
}

fn unresolved<'a>(requested: &'a BTreeSet<String>, found: &BTreeSet<&str>) -> Vec<&'a str> {
    requested
        .iter()
        .map(String::as_str)
        .filter(|name| !found.contains(name))
        .collect()
}

//! Unlocked id/name lookups shared by every entity table.

use std::collections::BTreeMap;

use sqlx::PgPool;

use crate::common::{CatalogEntity, CatalogResult, EntityName, Id};

/// `(id, name, is_protected)` of every row, ordered by id.
pub async fn list_names<E: CatalogEntity>(pool: &PgPool) -> CatalogResult<Vec<EntityName<Id<E>>>> {
    let rows = sqlx::query_as::<_, (Id<E>, String, bool)>(&format!(
        "SELECT id, name, is_protected FROM {} ORDER BY id",
        E::TABLE.table_name()
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, name, is_protected)| EntityName {
            id,
            name,
            is_protected,
        })
        .collect())
}

/// Delete confirmation view of one row.
pub async fn find_name<E: CatalogEntity>(
    id: Id<E>,
    pool: &PgPool,
) -> CatalogResult<Option<EntityName<Id<E>>>> {
    let row = sqlx::query_as::<_, (Id<E>, String, bool)>(&format!(
        "SELECT id, name, is_protected FROM {} WHERE id = $1",
        E::TABLE.table_name()
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(id, name, is_protected)| EntityName {
        id,
        name,
        is_protected,
    }))
}

pub async fn is_protected<E: CatalogEntity>(id: Id<E>, pool: &PgPool) -> CatalogResult<Option<bool>> {
    sqlx::query_scalar::<_, bool>(&format!(
        "SELECT is_protected FROM {} WHERE id = $1",
        E::TABLE.table_name()
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(Into::into)
}

/// id -> name for the whole table, used to render related-entity lists.
pub async fn name_index<E: CatalogEntity>(pool: &PgPool) -> CatalogResult<BTreeMap<Id<E>, String>> {
    let rows = sqlx::query_as::<_, (Id<E>, String)>(&format!(
        "SELECT id, name FROM {}",
        E::TABLE.table_name()
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().collect())
}

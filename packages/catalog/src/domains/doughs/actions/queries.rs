use sqlx::PgPool;

use crate::common::{CatalogError, CatalogResult, CatalogTable, DoughId};
use crate::domains::doughs::data::{DoughBrief, DoughEdit};
use crate::domains::doughs::models::Dough;

pub async fn list_doughs_brief(pool: &PgPool) -> CatalogResult<Vec<DoughBrief>> {
    Ok(Dough::find_all(pool)
        .await?
        .into_iter()
        .map(DoughBrief::from)
        .collect())
}

pub async fn get_dough(id: DoughId, pool: &PgPool) -> CatalogResult<Dough> {
    Dough::find_by_id(id, pool)
        .await?
        .ok_or_else(|| CatalogError::not_found(CatalogTable::Doughs, id))
}

pub async fn get_dough_edit(id: DoughId, pool: &PgPool) -> CatalogResult<DoughEdit> {
    get_dough(id, pool).await.map(DoughEdit::from)
}

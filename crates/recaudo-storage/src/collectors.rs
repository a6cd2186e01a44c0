use recaudo_core::model::Collector;
use sqlx::PgPool;

use crate::StorageError;

pub async fn find_all(pool: &PgPool) -> Result<Vec<Collector>, StorageError> {
    let rows = sqlx::query_as::<_, Collector>("SELECT * FROM collectors ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Collector, StorageError> {
    sqlx::query_as::<_, Collector>("SELECT * FROM collectors WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| StorageError::not_found("collector", id))
}

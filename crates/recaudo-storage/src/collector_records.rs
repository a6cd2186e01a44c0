//! Collector-side raw record repository, the mirror of the Calimaco
//! family with `provider_status` as the status column.

use recaudo_core::model::{CollectorRecord, NewCollectorRecord, UpdateCollectorRecord};
use recaudo_core::{Page, PageParams};
use sqlx::PgPool;

use crate::{RecordFilter, StorageError};

const ENTITY: &str = "collector record";

pub async fn create(
    pool: &PgPool,
    new: NewCollectorRecord,
) -> Result<CollectorRecord, StorageError> {
    let row = sqlx::query_as::<_, CollectorRecord>(
        r#"
        INSERT INTO collector_records
            (collector_id, record_date, calimaco_id, calimaco_id_normalized,
             provider_id, client_name, amount, provider_status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(new.collector_id)
    .bind(new.record_date)
    .bind(&new.calimaco_id)
    .bind(&new.calimaco_id_normalized)
    .bind(&new.provider_id)
    .bind(&new.client_name)
    .bind(new.amount)
    .bind(&new.provider_status)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn find_all(pool: &PgPool) -> Result<Vec<CollectorRecord>, StorageError> {
    let rows = sqlx::query_as::<_, CollectorRecord>(
        "SELECT * FROM collector_records ORDER BY record_date DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<CollectorRecord, StorageError> {
    sqlx::query_as::<_, CollectorRecord>("SELECT * FROM collector_records WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| StorageError::not_found(ENTITY, id))
}

pub async fn find_by_collector(
    pool: &PgPool,
    collector_id: i32,
) -> Result<Vec<CollectorRecord>, StorageError> {
    let rows = sqlx::query_as::<_, CollectorRecord>(
        "SELECT * FROM collector_records WHERE collector_id = $1 ORDER BY record_date DESC",
    )
    .bind(collector_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_calimaco_id(
    pool: &PgPool,
    calimaco_id: &str,
) -> Result<Vec<CollectorRecord>, StorageError> {
    let rows = sqlx::query_as::<_, CollectorRecord>(
        "SELECT * FROM collector_records WHERE calimaco_id_normalized = $1 ORDER BY record_date DESC",
    )
    .bind(calimaco_id)
    .fetch_all(pool)
    .await?;
    if rows.is_empty() {
        return Err(StorageError::not_found(ENTITY, calimaco_id));
    }
    Ok(rows)
}

pub async fn find_by_status(
    pool: &PgPool,
    provider_status: &str,
    collector_id: Option<i32>,
    from_date: Option<String>,
    to_date: Option<String>,
    params: PageParams,
) -> Result<Page<CollectorRecord>, StorageError> {
    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM collector_records
        WHERE provider_status = $1
          AND ($2::int IS NULL OR collector_id = $2)
          AND ($3::text IS NULL OR record_date >= $3::text::timestamp)
          AND ($4::text IS NULL OR record_date <= $4::text::timestamp)
        "#,
    )
    .bind(provider_status)
    .bind(collector_id)
    .bind(&from_date)
    .bind(&to_date)
    .fetch_one(pool)
    .await?;

    let rows = sqlx::query_as::<_, CollectorRecord>(
        r#"
        SELECT * FROM collector_records
        WHERE provider_status = $1
          AND ($2::int IS NULL OR collector_id = $2)
          AND ($3::text IS NULL OR record_date >= $3::text::timestamp)
          AND ($4::text IS NULL OR record_date <= $4::text::timestamp)
        ORDER BY record_date DESC
        LIMIT $5 OFFSET $6
        "#,
    )
    .bind(provider_status)
    .bind(collector_id)
    .bind(&from_date)
    .bind(&to_date)
    .bind(params.limit)
    .bind(params.offset())
    .fetch_all(pool)
    .await?;

    Ok(Page::new(rows, total, params))
}

pub async fn find_with_filters(
    pool: &PgPool,
    filter: &RecordFilter,
    params: PageParams,
) -> Result<Page<CollectorRecord>, StorageError> {
    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM collector_records
        WHERE ($1::int IS NULL OR collector_id = $1)
          AND ($2::text IS NULL OR record_date >= $2::text::timestamp)
          AND ($3::text IS NULL OR record_date <= $3::text::timestamp)
          AND ($4::text[] IS NULL OR provider_status = ANY($4::text[]))
        "#,
    )
    .bind(filter.collector_id)
    .bind(&filter.from_date)
    .bind(&filter.to_date)
    .bind(&filter.statuses)
    .fetch_one(pool)
    .await?;

    let rows = sqlx::query_as::<_, CollectorRecord>(
        r#"
        SELECT * FROM collector_records
        WHERE ($1::int IS NULL OR collector_id = $1)
          AND ($2::text IS NULL OR record_date >= $2::text::timestamp)
          AND ($3::text IS NULL OR record_date <= $3::text::timestamp)
          AND ($4::text[] IS NULL OR provider_status = ANY($4::text[]))
        ORDER BY record_date DESC
        LIMIT $5 OFFSET $6
        "#,
    )
    .bind(filter.collector_id)
    .bind(&filter.from_date)
    .bind(&filter.to_date)
    .bind(&filter.statuses)
    .bind(params.limit)
    .bind(params.offset())
    .fetch_all(pool)
    .await?;

    Ok(Page::new(rows, total, params))
}

pub async fn update(
    pool: &PgPool,
    id: i32,
    changes: UpdateCollectorRecord,
) -> Result<CollectorRecord, StorageError> {
    let current = find_by_id(pool, id).await?;
    let row = sqlx::query_as::<_, CollectorRecord>(
        r#"
        UPDATE collector_records
           SET collector_id = $2,
               record_date = $3,
               calimaco_id = $4,
               calimaco_id_normalized = $5,
               provider_id = $6,
               client_name = $7,
               amount = $8,
               provider_status = $9,
               updated_at = NOW()
         WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(changes.collector_id.unwrap_or(current.collector_id))
    .bind(changes.record_date.unwrap_or(current.record_date))
    .bind(changes.calimaco_id.unwrap_or(current.calimaco_id))
    .bind(changes.calimaco_id_normalized.or(current.calimaco_id_normalized))
    .bind(changes.provider_id.or(current.provider_id))
    .bind(changes.client_name.or(current.client_name))
    .bind(changes.amount.unwrap_or(current.amount))
    .bind(changes.provider_status.unwrap_or(current.provider_status))
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn delete(pool: &PgPool, id: i32) -> Result<(), StorageError> {
    find_by_id(pool, id).await?;
    sqlx::query("DELETE FROM collector_records WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

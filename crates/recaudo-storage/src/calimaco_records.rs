//! Provider-side (Calimaco) raw record repository.

use recaudo_core::model::{CalimacoRecord, NewCalimacoRecord, UpdateCalimacoRecord};
use recaudo_core::{Page, PageParams};
use sqlx::PgPool;

use crate::{RecordFilter, StorageError};

const ENTITY: &str = "calimaco record";

pub async fn create(pool: &PgPool, new: NewCalimacoRecord) -> Result<CalimacoRecord, StorageError> {
    let row = sqlx::query_as::<_, CalimacoRecord>(
        r#"
        INSERT INTO calimaco_records
            (collector_id, calimaco_id, calimaco_id_normalized, record_date,
             modification_date, status, user_id, amount, external_id, comments)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(new.collector_id)
    .bind(&new.calimaco_id)
    .bind(&new.calimaco_id_normalized)
    .bind(new.record_date)
    .bind(new.modification_date)
    .bind(&new.status)
    .bind(&new.user_id)
    .bind(new.amount)
    .bind(&new.external_id)
    .bind(&new.comments)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn find_all(pool: &PgPool) -> Result<Vec<CalimacoRecord>, StorageError> {
    let rows = sqlx::query_as::<_, CalimacoRecord>(
        "SELECT * FROM calimaco_records ORDER BY record_date DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<CalimacoRecord, StorageError> {
    sqlx::query_as::<_, CalimacoRecord>("SELECT * FROM calimaco_records WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| StorageError::not_found(ENTITY, id))
}

pub async fn find_by_collector(
    pool: &PgPool,
    collector_id: i32,
) -> Result<Vec<CalimacoRecord>, StorageError> {
    let rows = sqlx::query_as::<_, CalimacoRecord>(
        "SELECT * FROM calimaco_records WHERE collector_id = $1 ORDER BY record_date DESC",
    )
    .bind(collector_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Lookup by normalized external id. An empty result means the caller's
/// key was wrong, so it surfaces as NotFound rather than an empty list.
pub async fn find_by_calimaco_id(
    pool: &PgPool,
    calimaco_id: &str,
) -> Result<Vec<CalimacoRecord>, StorageError> {
    let rows = sqlx::query_as::<_, CalimacoRecord>(
        "SELECT * FROM calimaco_records WHERE calimaco_id_normalized = $1 ORDER BY record_date DESC",
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
    status: &str,
    collector_id: Option<i32>,
    from_date: Option<String>,
    to_date: Option<String>,
    params: PageParams,
) -> Result<Page<CalimacoRecord>, StorageError> {
    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM calimaco_records
        WHERE status = $1
          AND ($2::int IS NULL OR collector_id = $2)
          AND ($3::text IS NULL OR record_date >= $3::text::timestamp)
          AND ($4::text IS NULL OR record_date <= $4::text::timestamp)
        "#,
    )
    .bind(status)
    .bind(collector_id)
    .bind(&from_date)
    .bind(&to_date)
    .fetch_one(pool)
    .await?;

    let rows = sqlx::query_as::<_, CalimacoRecord>(
        r#"
        SELECT * FROM calimaco_records
        WHERE status = $1
          AND ($2::int IS NULL OR collector_id = $2)
          AND ($3::text IS NULL OR record_date >= $3::text::timestamp)
          AND ($4::text IS NULL OR record_date <= $4::text::timestamp)
        ORDER BY record_date DESC
        LIMIT $5 OFFSET $6
        "#,
    )
    .bind(status)
    .bind(collector_id)
    .bind(&from_date)
    .bind(&to_date)
    .bind(params.limit)
    .bind(params.offset())
    .fetch_all(pool)
    .await?;

    Ok(Page::new(rows, total, params))
}

/// Filtered listing; every filter optional, an empty page is a success.
pub async fn find_with_filters(
    pool: &PgPool,
    filter: &RecordFilter,
    params: PageParams,
) -> Result<Page<CalimacoRecord>, StorageError> {
    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM calimaco_records
        WHERE ($1::int IS NULL OR collector_id = $1)
          AND ($2::text IS NULL OR record_date >= $2::text::timestamp)
          AND ($3::text IS NULL OR record_date <= $3::text::timestamp)
          AND ($4::text[] IS NULL OR status = ANY($4::text[]))
        "#,
    )
    .bind(filter.collector_id)
    .bind(&filter.from_date)
    .bind(&filter.to_date)
    .bind(&filter.statuses)
    .fetch_one(pool)
    .await?;

    let rows = sqlx::query_as::<_, CalimacoRecord>(
        r#"
        SELECT * FROM calimaco_records
        WHERE ($1::int IS NULL OR collector_id = $1)
          AND ($2::text IS NULL OR record_date >= $2::text::timestamp)
          AND ($3::text IS NULL OR record_date <= $3::text::timestamp)
          AND ($4::text[] IS NULL OR status = ANY($4::text[]))
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
    changes: UpdateCalimacoRecord,
) -> Result<CalimacoRecord, StorageError> {
    let current = find_by_id(pool, id).await?;
    let row = sqlx::query_as::<_, CalimacoRecord>(
        r#"
        UPDATE calimaco_records
           SET collector_id = $2,
               calimaco_id = $3,
               calimaco_id_normalized = $4,
               record_date = $5,
               modification_date = $6,
               status = $7,
               user_id = $8,
               amount = $9,
               external_id = $10,
               comments = $11,
               updated_at = NOW()
         WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(changes.collector_id.unwrap_or(current.collector_id))
    .bind(changes.calimaco_id.unwrap_or(current.calimaco_id))
    .bind(changes.calimaco_id_normalized.or(current.calimaco_id_normalized))
    .bind(changes.record_date.unwrap_or(current.record_date))
    .bind(changes.modification_date.or(current.modification_date))
    .bind(changes.status.unwrap_or(current.status))
    .bind(changes.user_id.or(current.user_id))
    .bind(changes.amount.unwrap_or(current.amount))
    .bind(changes.external_id.or(current.external_id))
    .bind(changes.comments.or(current.comments))
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Hard delete; re-fetches first so deleting a gone row is NotFound
/// instead of a silent no-op.
pub async fn delete(pool: &PgPool, id: i32) -> Result<(), StorageError> {
    find_by_id(pool, id).await?;
    sqlx::query("DELETE FROM calimaco_records WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

//! Conciliation repository. Reads return [`ConciliationView`] with the
//! collector and attached files eagerly loaded.

use std::collections::HashMap;

use recaudo_core::model::{Collector, Conciliation, ConciliationFile, ConciliationView};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use sqlx::PgPool;

use crate::StorageError;

const ENTITY: &str = "conciliation";

/// Scalar totals from `get_conciliations_summary`.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ConciliationStats {
    pub total_amount: Decimal,
    pub total_amount_collector: Decimal,
}

impl Default for ConciliationStats {
    fn default() -> Self {
        Self {
            total_amount: Decimal::ZERO,
            total_amount_collector: Decimal::ZERO,
        }
    }
}

async fn load_views(
    pool: &PgPool,
    rows: Vec<Conciliation>,
) -> Result<Vec<ConciliationView>, StorageError> {
    let ids: Vec<i32> = rows.iter().map(|c| c.id).collect();
    let collector_ids: Vec<i32> = rows.iter().map(|c| c.collector_id).collect();

    let collectors = sqlx::query_as::<_, Collector>("SELECT * FROM collectors WHERE id = ANY($1)")
        .bind(&collector_ids)
        .fetch_all(pool)
        .await?;
    let files = sqlx::query_as::<_, ConciliationFile>(
        "SELECT * FROM conciliation_files WHERE conciliation_id = ANY($1) ORDER BY id",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let collectors: HashMap<i32, Collector> =
        collectors.into_iter().map(|c| (c.id, c)).collect();
    let mut grouped: HashMap<i32, Vec<ConciliationFile>> = HashMap::new();
    for file in files {
        grouped.entry(file.conciliation_id).or_default().push(file);
    }

    Ok(rows
        .into_iter()
        .map(|c| ConciliationView {
            collector: collectors.get(&c.collector_id).cloned(),
            files: grouped.remove(&c.id).unwrap_or_default(),
            conciliation: c,
        })
        .collect())
}

pub async fn find_all(pool: &PgPool) -> Result<Vec<ConciliationView>, StorageError> {
    let rows =
        sqlx::query_as::<_, Conciliation>("SELECT * FROM conciliations ORDER BY created_at DESC")
            .fetch_all(pool)
            .await?;
    load_views(pool, rows).await
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<ConciliationView, StorageError> {
    let row = sqlx::query_as::<_, Conciliation>("SELECT * FROM conciliations WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| StorageError::not_found(ENTITY, id))?;
    let mut views = load_views(pool, vec![row]).await?;
    Ok(views.remove(0))
}

/// Both boundaries match on the day, not the exact timestamp.
pub async fn find_by_date_range(
    pool: &PgPool,
    from: chrono::NaiveDate,
    to: chrono::NaiveDate,
) -> Result<Vec<ConciliationView>, StorageError> {
    let rows = sqlx::query_as::<_, Conciliation>(
        r#"
        SELECT * FROM conciliations
        WHERE from_date = $1 AND to_date = $2
        ORDER BY from_date DESC
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;
    load_views(pool, rows).await
}

pub async fn find_by_collector_name(
    pool: &PgPool,
    name: &str,
) -> Result<Vec<ConciliationView>, StorageError> {
    let pattern = format!("%{name}%");
    let rows = sqlx::query_as::<_, Conciliation>(
        r#"
        SELECT c.* FROM conciliations c
        JOIN collectors col ON col.id = c.collector_id
        WHERE col.name ILIKE $1
        ORDER BY c.created_at DESC
        "#,
    )
    .bind(&pattern)
    .fetch_all(pool)
    .await?;
    load_views(pool, rows).await
}

pub async fn stats(
    pool: &PgPool,
    collector_id: i32,
    from_date: Option<String>,
    to_date: Option<String>,
) -> Result<ConciliationStats, StorageError> {
    let row = sqlx::query_as::<_, ConciliationStats>(
        r#"
        SELECT COALESCE(total_amount, 0) AS total_amount,
               COALESCE(total_amount_collector, 0) AS total_amount_collector
          FROM get_conciliations_summary($1, $2::text::date, $3::text::date)
        "#,
    )
    .bind(collector_id)
    .bind(&from_date)
    .bind(&to_date)
    .fetch_optional(pool)
    .await?;
    Ok(row.unwrap_or_default())
}

/// Per-day rollup rows from `get_conciliations_summary_by_day`; the row
/// shape is owned by the database function and passed through opaquely.
pub async fn summary(
    pool: &PgPool,
    collector_ids: Vec<i32>,
    from_date: Option<String>,
    to_date: Option<String>,
) -> Result<Vec<Value>, StorageError> {
    let rows = sqlx::query_scalar::<_, Value>(
        r#"
        SELECT row_to_json(t) AS row
          FROM get_conciliations_summary_by_day($1::int[], $2::text::date, $3::text::date) t
        "#,
    )
    .bind(&collector_ids)
    .bind(&from_date)
    .bind(&to_date)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn delete(pool: &PgPool, id: i32) -> Result<(), StorageError> {
    find_by_id(pool, id).await?;
    sqlx::query("DELETE FROM conciliations WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

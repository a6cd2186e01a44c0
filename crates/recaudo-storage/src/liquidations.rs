//! Liquidation repository, the settlement-side mirror of conciliations.

use std::collections::HashMap;

use recaudo_core::model::{Collector, Liquidation, LiquidationFile, LiquidationView};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use sqlx::PgPool;

use crate::StorageError;

const ENTITY: &str = "liquidation";

/// Scalar totals from `get_liquidations_summary`.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LiquidationStats {
    pub total_amount_collector: Decimal,
    pub total_amount_liquidation: Decimal,
}

impl Default for LiquidationStats {
    fn default() -> Self {
        Self {
            total_amount_collector: Decimal::ZERO,
            total_amount_liquidation: Decimal::ZERO,
        }
    }
}

async fn load_views(
    pool: &PgPool,
    rows: Vec<Liquidation>,
) -> Result<Vec<LiquidationView>, StorageError> {
    let ids: Vec<i32> = rows.iter().map(|l| l.id).collect();
    let collector_ids: Vec<i32> = rows.iter().map(|l| l.collector_id).collect();

    let collectors = sqlx::query_as::<_, Collector>("SELECT * FROM collectors WHERE id = ANY($1)")
        .bind(&collector_ids)
        .fetch_all(pool)
        .await?;
    let files = sqlx::query_as::<_, LiquidationFile>(
        "SELECT * FROM liquidation_files WHERE liquidation_id = ANY($1) ORDER BY id",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let collectors: HashMap<i32, Collector> =
        collectors.into_iter().map(|c| (c.id, c)).collect();
    let mut grouped: HashMap<i32, Vec<LiquidationFile>> = HashMap::new();
    for file in files {
        grouped.entry(file.liquidation_id).or_default().push(file);
    }

    Ok(rows
        .into_iter()
        .map(|l| LiquidationView {
            collector: collectors.get(&l.collector_id).cloned(),
            files: grouped.remove(&l.id).unwrap_or_default(),
            liquidation: l,
        })
        .collect())
}

pub async fn find_all(pool: &PgPool) -> Result<Vec<LiquidationView>, StorageError> {
    let rows =
        sqlx::query_as::<_, Liquidation>("SELECT * FROM liquidations ORDER BY created_at DESC")
            .fetch_all(pool)
            .await?;
    load_views(pool, rows).await
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<LiquidationView, StorageError> {
    let row = sqlx::query_as::<_, Liquidation>("SELECT * FROM liquidations WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| StorageError::not_found(ENTITY, id))?;
    let mut views = load_views(pool, vec![row]).await?;
    Ok(views.remove(0))
}

pub async fn find_by_date_range(
    pool: &PgPool,
    from: chrono::NaiveDate,
    to: chrono::NaiveDate,
) -> Result<Vec<LiquidationView>, StorageError> {
    let rows = sqlx::query_as::<_, Liquidation>(
        r#"
        SELECT * FROM liquidations
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
) -> Result<Vec<LiquidationView>, StorageError> {
    let pattern = format!("%{name}%");
    let rows = sqlx::query_as::<_, Liquidation>(
        r#"
        SELECT l.* FROM liquidations l
        JOIN collectors col ON col.id = l.collector_id
        WHERE col.name ILIKE $1
        ORDER BY l.created_at DESC
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
) -> Result<LiquidationStats, StorageError> {
    let row = sqlx::query_as::<_, LiquidationStats>(
        r#"
        SELECT COALESCE(total_amount_collector, 0) AS total_amount_collector,
               COALESCE(total_amount_liquidation, 0) AS total_amount_liquidation
          FROM get_liquidations_summary($1, $2::text::date, $3::text::date)
        "#,
    )
    .bind(collector_id)
    .bind(&from_date)
    .bind(&to_date)
    .fetch_optional(pool)
    .await?;
    Ok(row.unwrap_or_default())
}

pub async fn summary(
    pool: &PgPool,
    collector_ids: Vec<i32>,
    from_date: Option<String>,
    to_date: Option<String>,
) -> Result<Vec<Value>, StorageError> {
    let rows = sqlx::query_scalar::<_, Value>(
        r#"
        SELECT row_to_json(t) AS row
          FROM get_liquidations_summary_by_day($1::int[], $2::text::date, $3::text::date) t
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
    sqlx::query("DELETE FROM liquidations WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

//! Reconciliation discrepancy repository.
//!
//! `id_report` points at either a conciliation or a liquidation, so both
//! candidate rows are loaded naively and the resolver decides which one
//! survives before anything leaves this module.

use std::collections::HashMap;

use recaudo_core::model::{ConciliationRef, Discrepancy, DiscrepancyView, LiquidationRef};
use recaudo_core::resolve_associations;
use sqlx::PgPool;

use crate::StorageError;

const ENTITY: &str = "discrepancy";

async fn load_views(
    pool: &PgPool,
    rows: Vec<Discrepancy>,
) -> Result<Vec<DiscrepancyView>, StorageError> {
    let report_ids: Vec<i32> = rows.iter().map(|d| d.id_report).collect();

    let conciliations = sqlx::query_as::<_, ConciliationRef>(
        r#"
        SELECT c.id, c.collector_id, col.name AS collector_name,
               c.from_date, c.to_date, c.amount, c.amount_collector,
               c.difference_amounts, c.conciliations_state
          FROM conciliations c
          LEFT JOIN collectors col ON col.id = c.collector_id
         WHERE c.id = ANY($1)
        "#,
    )
    .bind(&report_ids)
    .fetch_all(pool)
    .await?;

    let liquidations = sqlx::query_as::<_, LiquidationRef>(
        r#"
        SELECT l.id, l.collector_id, col.name AS collector_name,
               l.from_date, l.to_date, l.amount_collector,
               l.amount_liquidation, l.difference_amounts
          FROM liquidations l
          LEFT JOIN collectors col ON col.id = l.collector_id
         WHERE l.id = ANY($1)
        "#,
    )
    .bind(&report_ids)
    .fetch_all(pool)
    .await?;

    let conciliations: HashMap<i32, ConciliationRef> =
        conciliations.into_iter().map(|c| (c.id, c)).collect();
    let liquidations: HashMap<i32, LiquidationRef> =
        liquidations.into_iter().map(|l| (l.id, l)).collect();

    let mut views: Vec<DiscrepancyView> = rows
        .into_iter()
        .map(|d| DiscrepancyView {
            conciliation: conciliations.get(&d.id_report).cloned(),
            liquidation: liquidations.get(&d.id_report).cloned(),
            discrepancy: d,
        })
        .collect();
    resolve_associations(&mut views);
    Ok(views)
}

pub async fn find_all(pool: &PgPool) -> Result<Vec<DiscrepancyView>, StorageError> {
    let rows = sqlx::query_as::<_, Discrepancy>(
        "SELECT * FROM reconciliation_discrepancies ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?;
    load_views(pool, rows).await
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<DiscrepancyView, StorageError> {
    let row =
        sqlx::query_as::<_, Discrepancy>("SELECT * FROM reconciliation_discrepancies WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| StorageError::not_found(ENTITY, id))?;
    let mut views = load_views(pool, vec![row]).await?;
    Ok(views.remove(0))
}

pub async fn find_by_status(
    pool: &PgPool,
    status: &str,
) -> Result<Vec<DiscrepancyView>, StorageError> {
    let rows = sqlx::query_as::<_, Discrepancy>(
        "SELECT * FROM reconciliation_discrepancies WHERE status = $1 ORDER BY created_at DESC",
    )
    .bind(status)
    .fetch_all(pool)
    .await?;
    load_views(pool, rows).await
}

/// Writes the status column only, then re-reads and re-resolves so the
/// caller always sees a consistent view.
pub async fn update_status(
    pool: &PgPool,
    id: i32,
    status: &str,
) -> Result<DiscrepancyView, StorageError> {
    let result = sqlx::query(
        "UPDATE reconciliation_discrepancies SET status = $2, updated_at = NOW() WHERE id = $1",
    )
    .bind(id)
    .bind(status)
    .execute(pool)
    .await?;
    if result.rows_affected() == 0 {
        return Err(StorageError::not_found(ENTITY, id));
    }
    find_by_id(pool, id).await
}

pub async fn delete(pool: &PgPool, id: i32) -> Result<(), StorageError> {
    let existing =
        sqlx::query_as::<_, Discrepancy>("SELECT * FROM reconciliation_discrepancies WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    if existing.is_none() {
        return Err(StorageError::not_found(ENTITY, id));
    }
    sqlx::query("DELETE FROM reconciliation_discrepancies WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

//! Report query builder over the database-side aggregate functions.
//!
//! The stored functions (`get_conciliados`, `get_no_conciliados`, ...)
//! own the reconciliation arithmetic; their positional signatures and
//! result shapes are a frozen contract. This module only normalizes the
//! parameters that go in: date boundary widening, default substitution,
//! pagination arithmetic. [`ReportPlan`] captures one normalized call as
//! plain data so the normalization is testable without a database.

use recaudo_core::dates::{today, widen_lower_bound, widen_upper_bound};
use recaudo_core::{Page, PageParams};
use serde_json::Value;
use sqlx::PgPool;

use crate::StorageError;

#[derive(Debug, Clone, PartialEq)]
pub struct ReportPlan {
    function: &'static str,
    collector_ids: Option<Vec<i32>>,
    from_date: Option<String>,
    to_date: Option<String>,
    order_by: Option<&'static str>,
    page: Option<PageParams>,
}

impl ReportPlan {
    pub fn daily_full_reconciliation(
        collector_ids: Vec<i32>,
        from_date: &str,
        to_date: &str,
        page: PageParams,
    ) -> Self {
        Self {
            function: "get_conciliacion_completa_por_dia",
            collector_ids: Some(collector_ids),
            from_date: Some(widen_lower_bound(from_date)),
            to_date: Some(widen_upper_bound(to_date)),
            order_by: None,
            page: Some(page),
        }
    }

    pub fn reconciled(
        collector_ids: Vec<i32>,
        from_date: &str,
        to_date: &str,
        page: PageParams,
    ) -> Self {
        Self {
            function: "get_conciliados",
            collector_ids: Some(collector_ids),
            from_date: Some(widen_lower_bound(from_date)),
            to_date: Some(widen_upper_bound(to_date)),
            order_by: Some("calimaco_date DESC"),
            page: Some(page),
        }
    }

    pub fn unreconciled(
        collector_ids: Vec<i32>,
        from_date: &str,
        to_date: &str,
        page: PageParams,
    ) -> Self {
        Self {
            function: "get_no_conciliados",
            collector_ids: Some(collector_ids),
            from_date: Some(widen_lower_bound(from_date)),
            to_date: Some(widen_upper_bound(to_date)),
            order_by: Some("record_date DESC"),
            page: Some(page),
        }
    }

    /// Every filter is optional; an absent or empty collector set becomes
    /// a database NULL so the function applies its own default universe.
    pub fn collector_sales_report(
        collector_ids: Option<Vec<i32>>,
        from_date: Option<&str>,
        to_date: Option<&str>,
        page: PageParams,
    ) -> Self {
        Self {
            function: "get_reporte_ventas_recaudadores",
            collector_ids: collector_ids.filter(|ids| !ids.is_empty()),
            from_date: from_date.map(widen_lower_bound),
            to_date: to_date.map(widen_upper_bound),
            order_by: None,
            page: Some(page),
        }
    }

    /// Unpaginated accumulated report. The fallback collector universe is
    /// injected configuration, not a literal; an absent date bound
    /// defaults to today's full day.
    pub fn accumulated_full_reconciliation(
        collector_ids: Option<Vec<i32>>,
        from_date: Option<&str>,
        to_date: Option<&str>,
        default_collector_ids: &[i32],
    ) -> Self {
        let collector_ids = match collector_ids {
            Some(ids) if !ids.is_empty() => ids,
            _ => default_collector_ids.to_vec(),
        };
        let current = today();
        Self {
            function: "get_conciliacion_completa_acumulado",
            collector_ids: Some(collector_ids),
            from_date: Some(
                from_date.map_or_else(|| widen_lower_bound(&current), widen_lower_bound),
            ),
            to_date: Some(to_date.map_or_else(|| widen_upper_bound(&current), widen_upper_bound)),
            order_by: None,
            page: None,
        }
    }

    pub fn function(&self) -> &str {
        self.function
    }

    pub fn collector_ids(&self) -> Option<&[i32]> {
        self.collector_ids.as_deref()
    }

    pub fn from_date(&self) -> Option<&str> {
        self.from_date.as_deref()
    }

    pub fn to_date(&self) -> Option<&str> {
        self.to_date.as_deref()
    }

    pub fn page(&self) -> Option<PageParams> {
        self.page
    }

    /// Row query. `$1..$3` are the shared filter params; LIMIT/OFFSET are
    /// the only extras relative to [`Self::count_sql`].
    pub fn fetch_sql(&self) -> String {
        let mut sql = format!(
            "SELECT row_to_json(t) AS row FROM {}($1::int[], $2::text::timestamp, $3::text::timestamp) t",
            self.function
        );
        if let Some(order_by) = self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order_by);
        }
        if self.page.is_some() {
            sql.push_str(" LIMIT $4 OFFSET $5");
        }
        sql
    }

    pub fn count_sql(&self) -> String {
        format!(
            "SELECT COUNT(*) AS total FROM {}($1::int[], $2::text::timestamp, $3::text::timestamp) t",
            self.function
        )
    }
}

/// Runs the count and fetch queries concurrently with identical filter
/// params. If either side fails the whole operation fails; no partial
/// page is ever returned.
pub async fn fetch_paginated(
    pool: &PgPool,
    plan: &ReportPlan,
) -> Result<Page<Value>, StorageError> {
    let params = plan.page.unwrap_or_default();
    let fetch_sql = plan.fetch_sql();
    let count_sql = plan.count_sql();

    let fetch = sqlx::query_scalar::<_, Value>(&fetch_sql)
        .bind(&plan.collector_ids)
        .bind(&plan.from_date)
        .bind(&plan.to_date)
        .bind(params.limit)
        .bind(params.offset())
        .fetch_all(pool);
    let count = sqlx::query_scalar::<_, i64>(&count_sql)
        .bind(&plan.collector_ids)
        .bind(&plan.from_date)
        .bind(&plan.to_date)
        .fetch_one(pool);

    let (rows, total) = tokio::try_join!(fetch, count)?;
    Ok(Page::new(rows, total, params))
}

/// Runs an unpaginated plan and returns the full row set.
pub async fn fetch_full(pool: &PgPool, plan: &ReportPlan) -> Result<Vec<Value>, StorageError> {
    let fetch_sql = plan.fetch_sql();
    let rows = sqlx::query_scalar::<_, Value>(&fetch_sql)
        .bind(&plan.collector_ids)
        .bind(&plan.from_date)
        .bind(&plan.to_date)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_plan_widens_bounds_and_paginates() {
        let plan = ReportPlan::daily_full_reconciliation(
            vec![1, 2],
            "2024-01-01",
            "2024-01-31",
            PageParams::new(2, 10),
        );

        assert_eq!(plan.function(), "get_conciliacion_completa_por_dia");
        assert_eq!(plan.collector_ids(), Some(&[1, 2][..]));
        assert_eq!(plan.from_date(), Some("2024-01-01 00:00:00"));
        assert_eq!(plan.to_date(), Some("2024-01-31 23:59:59"));

        let page = plan.page().unwrap();
        assert_eq!(page.limit, 10);
        assert_eq!(page.offset(), 10);

        let fetch = plan.fetch_sql();
        assert!(fetch.ends_with("LIMIT $4 OFFSET $5"));
        let count = plan.count_sql();
        assert!(!count.contains("LIMIT"));
        for param in ["$1::int[]", "$2::text::timestamp", "$3::text::timestamp"] {
            assert!(fetch.contains(param));
            assert!(count.contains(param));
        }
    }

    #[test]
    fn bounds_with_time_components_pass_through() {
        let plan = ReportPlan::reconciled(
            vec![3],
            "2024-05-01 08:00:00",
            "2024-05-01 12:00:00",
            PageParams::default(),
        );
        assert_eq!(plan.from_date(), Some("2024-05-01 08:00:00"));
        assert_eq!(plan.to_date(), Some("2024-05-01 12:00:00"));
    }

    #[test]
    fn reconciled_and_unreconciled_order_only_the_fetch() {
        let plan = ReportPlan::reconciled(vec![1], "2024-01-01", "2024-01-02", PageParams::default());
        assert!(plan.fetch_sql().contains("ORDER BY calimaco_date DESC"));
        assert!(!plan.count_sql().contains("ORDER BY"));

        let plan =
            ReportPlan::unreconciled(vec![1], "2024-01-01", "2024-01-02", PageParams::default());
        assert_eq!(plan.function(), "get_no_conciliados");
        assert!(plan.fetch_sql().contains("ORDER BY record_date DESC"));
    }

    #[test]
    fn sales_report_turns_absent_filters_into_nulls() {
        let plan = ReportPlan::collector_sales_report(None, None, None, PageParams::default());
        assert_eq!(plan.collector_ids(), None);
        assert_eq!(plan.from_date(), None);
        assert_eq!(plan.to_date(), None);

        let plan =
            ReportPlan::collector_sales_report(Some(vec![]), None, None, PageParams::default());
        assert_eq!(plan.collector_ids(), None);
    }

    #[test]
    fn accumulated_defaults_come_from_configuration() {
        let defaults = [1, 2, 3, 4, 5, 6, 7, 8, 9];
        let plan = ReportPlan::accumulated_full_reconciliation(None, None, None, &defaults);

        assert_eq!(plan.function(), "get_conciliacion_completa_acumulado");
        assert_eq!(plan.collector_ids(), Some(&defaults[..]));
        let expected = today();
        assert_eq!(plan.from_date(), Some(format!("{expected} 00:00:00").as_str()));
        assert_eq!(plan.to_date(), Some(format!("{expected} 23:59:59").as_str()));
        assert_eq!(plan.page(), None);
        assert!(!plan.fetch_sql().contains("LIMIT"));
    }

    #[test]
    fn accumulated_keeps_explicit_filters() {
        let plan = ReportPlan::accumulated_full_reconciliation(
            Some(vec![4, 5]),
            Some("2024-02-01"),
            Some("2024-02-28"),
            &[1, 2, 3],
        );
        assert_eq!(plan.collector_ids(), Some(&[4, 5][..]));
        assert_eq!(plan.from_date(), Some("2024-02-01 00:00:00"));
        assert_eq!(plan.to_date(), Some("2024-02-28 23:59:59"));
    }
}

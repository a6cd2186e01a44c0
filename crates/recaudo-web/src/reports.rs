//! Reconciliation report endpoints backed by the database aggregate
//! functions. Handlers only validate and normalize parameters; the
//! arithmetic lives server-side.

use axum::extract::State;
use axum::http::Uri;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use recaudo_core::PageParams;
use recaudo_storage::reports as store;
use recaudo_storage::ReportPlan;
use serde::Deserialize;

use crate::config::parse_collector_list;
use crate::error::validation;
use crate::extract::Query;
use crate::{envelope, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/por-dia", get(daily))
        .route("/conciliados", get(reconciled))
        .route("/no-conciliados", get(unreconciled))
        .route("/ventas-recaudadores", get(collector_sales))
        .route("/acumulado", get(accumulated))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportQuery {
    collector_ids: Option<String>,
    from_date: Option<String>,
    to_date: Option<String>,
    page: Option<i64>,
    limit: Option<i64>,
}

#[derive(Debug)]
struct RequiredFilters {
    collector_ids: Vec<i32>,
    from_date: String,
    to_date: String,
    page: PageParams,
}

/// The three windowed reports share the same mandatory filter set.
fn require_filters(query: ReportQuery) -> Result<RequiredFilters, Vec<String>> {
    let mut problems = Vec::new();
    let collector_ids = query
        .collector_ids
        .as_deref()
        .map(parse_collector_list)
        .filter(|ids| !ids.is_empty());
    if collector_ids.is_none() {
        problems.push("collectorIds is required".to_string());
    }
    if query.from_date.as_deref().unwrap_or("").is_empty() {
        problems.push("fromDate is required".to_string());
    }
    if query.to_date.as_deref().unwrap_or("").is_empty() {
        problems.push("toDate is required".to_string());
    }
    if !problems.is_empty() {
        return Err(problems);
    }
    Ok(RequiredFilters {
        collector_ids: collector_ids.unwrap_or_default(),
        from_date: query.from_date.unwrap_or_default(),
        to_date: query.to_date.unwrap_or_default(),
        page: PageParams::from_query(query.page, query.limit),
    })
}

async fn run_paginated(state: &AppState, uri: &Uri, plan: ReportPlan) -> Response {
    match store::fetch_paginated(&state.pool, &plan).await {
        Ok(page) => envelope::paginated(uri, page),
        Err(err) => state.err(err, uri),
    }
}

async fn daily(State(state): State<AppState>, uri: Uri, Query(query): Query<ReportQuery>) -> Response {
    let filters = match require_filters(query) {
        Ok(filters) => filters,
        Err(problems) => return state.err(validation(problems), &uri),
    };
    let plan = ReportPlan::daily_full_reconciliation(
        filters.collector_ids,
        &filters.from_date,
        &filters.to_date,
        filters.page,
    );
    run_paginated(&state, &uri, plan).await
}

async fn reconciled(
    State(state): State<AppState>,
    uri: Uri,
    Query(query): Query<ReportQuery>,
) -> Response {
    let filters = match require_filters(query) {
        Ok(filters) => filters,
        Err(problems) => return state.err(validation(problems), &uri),
    };
    let plan = ReportPlan::reconciled(
        filters.collector_ids,
        &filters.from_date,
        &filters.to_date,
        filters.page,
    );
    run_paginated(&state, &uri, plan).await
}

async fn unreconciled(
    State(state): State<AppState>,
    uri: Uri,
    Query(query): Query<ReportQuery>,
) -> Response {
    let filters = match require_filters(query) {
        Ok(filters) => filters,
        Err(problems) => return state.err(validation(problems), &uri),
    };
    let plan = ReportPlan::unreconciled(
        filters.collector_ids,
        &filters.from_date,
        &filters.to_date,
        filters.page,
    );
    run_paginated(&state, &uri, plan).await
}

/// Every filter optional; absent ones become database NULLs.
async fn collector_sales(
    State(state): State<AppState>,
    uri: Uri,
    Query(query): Query<ReportQuery>,
) -> Response {
    let collector_ids = query.collector_ids.as_deref().map(parse_collector_list);
    let plan = ReportPlan::collector_sales_report(
        collector_ids,
        query.from_date.as_deref(),
        query.to_date.as_deref(),
        PageParams::from_query(query.page, query.limit),
    );
    run_paginated(&state, &uri, plan).await
}

/// Unpaginated; the fallback collector universe comes from configuration.
async fn accumulated(
    State(state): State<AppState>,
    uri: Uri,
    Query(query): Query<ReportQuery>,
) -> Response {
    let collector_ids = query.collector_ids.as_deref().map(parse_collector_list);
    let plan = ReportPlan::accumulated_full_reconciliation(
        collector_ids,
        query.from_date.as_deref(),
        query.to_date.as_deref(),
        &state.config.report_default_collectors,
    );
    match store::fetch_full(&state.pool, &plan).await {
        Ok(rows) => envelope::ok(&uri, rows),
        Err(err) => state.err(err, &uri),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windowed_reports_collect_all_missing_filters() {
        let query = ReportQuery {
            collector_ids: None,
            from_date: None,
            to_date: Some(String::new()),
            page: None,
            limit: None,
        };
        let problems = require_filters(query).unwrap_err();
        assert_eq!(
            problems,
            vec![
                "collectorIds is required",
                "fromDate is required",
                "toDate is required"
            ]
        );
    }

    #[test]
    fn a_collector_list_of_junk_counts_as_missing() {
        let query = ReportQuery {
            collector_ids: Some("x,y".to_string()),
            from_date: Some("2024-01-01".to_string()),
            to_date: Some("2024-01-31".to_string()),
            page: None,
            limit: None,
        };
        let problems = require_filters(query).unwrap_err();
        assert_eq!(problems, vec!["collectorIds is required"]);
    }

    #[test]
    fn complete_filters_parse_and_paginate() {
        let query = ReportQuery {
            collector_ids: Some("1, 2,3".to_string()),
            from_date: Some("2024-01-01".to_string()),
            to_date: Some("2024-01-31".to_string()),
            page: Some(2),
            limit: Some(25),
        };
        let filters = require_filters(query).unwrap();
        assert_eq!(filters.collector_ids, vec![1, 2, 3]);
        assert_eq!(filters.page, PageParams::new(2, 25));
    }
}

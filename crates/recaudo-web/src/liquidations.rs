//! Liquidation read endpoints, mirroring the conciliation surface.

use axum::extract::State;
use axum::http::Uri;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use recaudo_storage::liquidations as store;

use crate::conciliations::{parse_range, RangeQuery, StatsQuery, SummaryQuery};
use crate::config::parse_collector_list;
use crate::error::validation;
use crate::extract::{Path, Query};
use crate::{envelope, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/stats", get(stats))
        .route("/summary", get(summary))
        .route("/range", get(by_range))
        .route("/collector/{name}", get(by_collector_name))
        .route("/{id}", get(by_id).delete(delete))
}

async fn list(State(state): State<AppState>, uri: Uri) -> Response {
    match store::find_all(&state.pool).await {
        Ok(views) => envelope::ok(&uri, views),
        Err(err) => state.err(err, &uri),
    }
}

async fn stats(State(state): State<AppState>, uri: Uri, Query(query): Query<StatsQuery>) -> Response {
    let Some(collector_id) = query.collector_id else {
        return state.err(validation(vec!["collectorId is required".to_string()]), &uri);
    };
    match store::stats(&state.pool, collector_id, query.from_date, query.to_date).await {
        Ok(stats) => envelope::ok(&uri, stats),
        Err(err) => state.err(err, &uri),
    }
}

async fn summary(
    State(state): State<AppState>,
    uri: Uri,
    Query(query): Query<SummaryQuery>,
) -> Response {
    let collector_ids = query
        .collector_ids
        .as_deref()
        .map(parse_collector_list)
        .filter(|ids| !ids.is_empty());
    let Some(collector_ids) = collector_ids else {
        return state.err(validation(vec!["collectorIds is required".to_string()]), &uri);
    };
    match store::summary(&state.pool, collector_ids, query.from_date, query.to_date).await {
        Ok(rows) => envelope::ok(&uri, rows),
        Err(err) => state.err(err, &uri),
    }
}

async fn by_range(
    State(state): State<AppState>,
    uri: Uri,
    Query(query): Query<RangeQuery>,
) -> Response {
    let (from, to) = match parse_range(&query) {
        Ok(bounds) => bounds,
        Err(problems) => return state.err(validation(problems), &uri),
    };
    match store::find_by_date_range(&state.pool, from, to).await {
        Ok(views) => envelope::ok(&uri, views),
        Err(err) => state.err(err, &uri),
    }
}

async fn by_collector_name(
    State(state): State<AppState>,
    uri: Uri,
    Path(name): Path<String>,
) -> Response {
    match store::find_by_collector_name(&state.pool, &name).await {
        Ok(views) => envelope::ok(&uri, views),
        Err(err) => state.err(err, &uri),
    }
}

async fn by_id(State(state): State<AppState>, uri: Uri, Path(id): Path<i32>) -> Response {
    match store::find_by_id(&state.pool, id).await {
        Ok(view) => envelope::ok(&uri, view),
        Err(err) => state.err(err, &uri),
    }
}

async fn delete(State(state): State<AppState>, uri: Uri, Path(id): Path<i32>) -> Response {
    match store::delete(&state.pool, id).await {
        Ok(()) => envelope::ok_with_message(&uri, envelope::MSG_DELETED, ()),
        Err(err) => state.err(err, &uri),
    }
}

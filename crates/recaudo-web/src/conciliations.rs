//! Conciliation read endpoints plus the summary aggregates.

use axum::extract::State;
use axum::http::Uri;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use chrono::NaiveDate;
use recaudo_storage::conciliations as store;
use serde::Deserialize;

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

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    pub collector_id: Option<i32>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryQuery {
    pub collector_ids: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Parses both bounds of a day range, collecting per-field problems so
/// the caller sees every issue at once.
pub fn parse_range(query: &RangeQuery) -> Result<(NaiveDate, NaiveDate), Vec<String>> {
    let mut problems = Vec::new();
    let from = match query.from.as_deref() {
        None | Some("") => {
            problems.push("from is required".to_string());
            None
        }
        Some(raw) => match raw.parse::<NaiveDate>() {
            Ok(date) => Some(date),
            Err(_) => {
                problems.push(format!("from is not a valid date: {raw}"));
                None
            }
        },
    };
    let to = match query.to.as_deref() {
        None | Some("") => {
            problems.push("to is required".to_string());
            None
        }
        Some(raw) => match raw.parse::<NaiveDate>() {
            Ok(date) => Some(date),
            Err(_) => {
                problems.push(format!("to is not a valid date: {raw}"));
                None
            }
        },
    };
    match (from, to) {
        (Some(from), Some(to)) if problems.is_empty() => Ok((from, to)),
        _ => Err(problems),
    }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_parsing_reports_every_problem_at_once() {
        let query = RangeQuery {
            from: None,
            to: Some("junk".to_string()),
        };
        let problems = parse_range(&query).unwrap_err();
        assert_eq!(problems.len(), 2);
        assert!(problems[0].contains("from is required"));
        assert!(problems[1].contains("to is not a valid date"));
    }

    #[test]
    fn range_parsing_accepts_iso_dates() {
        let query = RangeQuery {
            from: Some("2024-03-01".to_string()),
            to: Some("2024-03-31".to_string()),
        };
        let (from, to) = parse_range(&query).unwrap();
        assert_eq!(from, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(to, NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
    }
}

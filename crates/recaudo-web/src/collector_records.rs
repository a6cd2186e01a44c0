//! CRUD and lookup endpoints for collector-side records. Mirrors the
//! Calimaco record surface; the status filter targets `provider_status`.

use axum::extract::State;
use axum::http::Uri;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use recaudo_core::dates::{widen_lower_bound, widen_upper_bound};
use recaudo_core::model::{NewCollectorRecord, UpdateCollectorRecord};
use recaudo_core::PageParams;
use recaudo_storage::collector_records as store;
use recaudo_storage::RecordFilter;

use crate::calimaco_records::{split_statuses, FilterQuery, StatusQuery};
use crate::error::validation;
use crate::extract::{Json, Path, Query};
use crate::{envelope, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/filter", get(filter))
        .route("/by-status", get(by_status))
        .route("/by-collector/{id}", get(by_collector))
        .route("/by-calimaco-id/{id}", get(by_calimaco_id))
        .route("/{id}", get(by_id).patch(update).delete(delete))
}

async fn create(
    State(state): State<AppState>,
    uri: Uri,
    Json(new): Json<NewCollectorRecord>,
) -> Response {
    match store::create(&state.pool, new).await {
        Ok(record) => envelope::created(&uri, record),
        Err(err) => state.err(err, &uri),
    }
}

async fn list(State(state): State<AppState>, uri: Uri) -> Response {
    match store::find_all(&state.pool).await {
        Ok(records) => envelope::ok(&uri, records),
        Err(err) => state.err(err, &uri),
    }
}

async fn filter(
    State(state): State<AppState>,
    uri: Uri,
    Query(query): Query<FilterQuery>,
) -> Response {
    let filter = RecordFilter {
        collector_id: query.collector_id,
        from_date: query.from_date.as_deref().map(widen_lower_bound),
        to_date: query.to_date.as_deref().map(widen_upper_bound),
        statuses: split_statuses(query.statuses.as_deref()),
    };
    let params = PageParams::from_query(query.page, query.limit);
    match store::find_with_filters(&state.pool, &filter, params).await {
        Ok(page) => envelope::paginated(&uri, page),
        Err(err) => state.err(err, &uri),
    }
}

async fn by_status(
    State(state): State<AppState>,
    uri: Uri,
    Query(query): Query<StatusQuery>,
) -> Response {
    let Some(status) = query.status.filter(|s| !s.is_empty()) else {
        return state.err(validation(vec!["status is required".to_string()]), &uri);
    };
    let params = PageParams::from_query(query.page, query.limit);
    let from_date = query.from_date.as_deref().map(widen_lower_bound);
    let to_date = query.to_date.as_deref().map(widen_upper_bound);
    match store::find_by_status(&state.pool, &status, query.collector_id, from_date, to_date, params)
        .await
    {
        Ok(page) => envelope::paginated(&uri, page),
        Err(err) => state.err(err, &uri),
    }
}

async fn by_collector(State(state): State<AppState>, uri: Uri, Path(id): Path<i32>) -> Response {
    match store::find_by_collector(&state.pool, id).await {
        Ok(records) => envelope::ok(&uri, records),
        Err(err) => state.err(err, &uri),
    }
}

async fn by_calimaco_id(
    State(state): State<AppState>,
    uri: Uri,
    Path(id): Path<String>,
) -> Response {
    match store::find_by_calimaco_id(&state.pool, &id).await {
        Ok(records) => envelope::ok(&uri, records),
        Err(err) => state.err(err, &uri),
    }
}

async fn by_id(State(state): State<AppState>, uri: Uri, Path(id): Path<i32>) -> Response {
    match store::find_by_id(&state.pool, id).await {
        Ok(record) => envelope::ok(&uri, record),
        Err(err) => state.err(err, &uri),
    }
}

async fn update(
    State(state): State<AppState>,
    uri: Uri,
    Path(id): Path<i32>,
    Json(changes): Json<UpdateCollectorRecord>,
) -> Response {
    match store::update(&state.pool, id, changes).await {
        Ok(record) => envelope::ok_with_message(&uri, envelope::MSG_UPDATED, record),
        Err(err) => state.err(err, &uri),
    }
}

async fn delete(State(state): State<AppState>, uri: Uri, Path(id): Path<i32>) -> Response {
    match store::delete(&state.pool, id).await {
        Ok(()) => envelope::ok_with_message(&uri, envelope::MSG_DELETED, ()),
        Err(err) => state.err(err, &uri),
    }
}

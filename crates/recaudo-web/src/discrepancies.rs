//! Reconciliation discrepancy endpoints.

use axum::extract::State;
use axum::http::Uri;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use recaudo_storage::discrepancies as store;
use serde::Deserialize;

use crate::error::validation;
use crate::extract::{Json, Path, Query};
use crate::{envelope, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/{id}", get(by_id).delete(delete))
        .route("/{id}/status", axum::routing::patch(update_status))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusUpdate {
    status: Option<String>,
}

async fn list(State(state): State<AppState>, uri: Uri, Query(query): Query<ListQuery>) -> Response {
    let result = match query.status.filter(|s| !s.is_empty()) {
        Some(status) => store::find_by_status(&state.pool, &status).await,
        None => store::find_all(&state.pool).await,
    };
    match result {
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

async fn update_status(
    State(state): State<AppState>,
    uri: Uri,
    Path(id): Path<i32>,
    Json(body): Json<StatusUpdate>,
) -> Response {
    let Some(status) = body.status.filter(|s| !s.is_empty()) else {
        return state.err(validation(vec!["status is required".to_string()]), &uri);
    };
    match store::update_status(&state.pool, id, &status).await {
        Ok(view) => envelope::ok_with_message(&uri, envelope::MSG_UPDATED, view),
        Err(err) => state.err(err, &uri),
    }
}

async fn delete(State(state): State<AppState>, uri: Uri, Path(id): Path<i32>) -> Response {
    match store::delete(&state.pool, id).await {
        Ok(()) => envelope::ok_with_message(&uri, envelope::MSG_DELETED, ()),
        Err(err) => state.err(err, &uri),
    }
}

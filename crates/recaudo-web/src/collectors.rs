//! Read-only collector catalog endpoints.

use axum::extract::State;
use axum::http::Uri;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use recaudo_storage::collectors as store;

use crate::extract::Path;
use crate::{envelope, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/{id}", get(by_id))
}

async fn list(State(state): State<AppState>, uri: Uri) -> Response {
    match store::find_all(&state.pool).await {
        Ok(collectors) => envelope::ok(&uri, collectors),
        Err(err) => state.err(err, &uri),
    }
}

async fn by_id(State(state): State<AppState>, uri: Uri, Path(id): Path<i32>) -> Response {
    match store::find_by_id(&state.pool, id).await {
        Ok(collector) => envelope::ok(&uri, collector),
        Err(err) => state.err(err, &uri),
    }
}

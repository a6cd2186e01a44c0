//! Role catalog CRUD.

use axum::extract::State;
use axum::http::Uri;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use recaudo_core::model::{NewRole, UpdateRole};
use recaudo_storage::roles as store;

use crate::error::validation;
use crate::extract::{Json, Path};
use crate::{envelope, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(by_id).patch(update).delete(delete))
}

async fn create(
    State(state): State<AppState>,
    uri: Uri,
    Json(new): Json<NewRole>,
) -> Response {
    if new.name.is_empty() {
        return state.err(validation(vec!["name is required".to_string()]), &uri);
    }
    match store::create(&state.pool, &new).await {
        Ok(role) => envelope::created(&uri, role),
        Err(err) => state.err(err, &uri),
    }
}

async fn list(State(state): State<AppState>, uri: Uri) -> Response {
    match store::find_all(&state.pool).await {
        Ok(roles) => envelope::ok(&uri, roles),
        Err(err) => state.err(err, &uri),
    }
}

async fn by_id(State(state): State<AppState>, uri: Uri, Path(id): Path<i32>) -> Response {
    match store::find_by_id(&state.pool, id).await {
        Ok(role) => envelope::ok(&uri, role),
        Err(err) => state.err(err, &uri),
    }
}

async fn update(
    State(state): State<AppState>,
    uri: Uri,
    Path(id): Path<i32>,
    Json(changes): Json<UpdateRole>,
) -> Response {
    match store::update(&state.pool, id, changes).await {
        Ok(role) => envelope::ok_with_message(&uri, envelope::MSG_UPDATED, role),
        Err(err) => state.err(err, &uri),
    }
}

async fn delete(State(state): State<AppState>, uri: Uri, Path(id): Path<i32>) -> Response {
    match store::delete(&state.pool, id).await {
        Ok(()) => envelope::ok_with_message(&uri, envelope::MSG_DELETED, ()),
        Err(err) => state.err(err, &uri),
    }
}

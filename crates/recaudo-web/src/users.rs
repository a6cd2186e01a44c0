//! User management endpoints. Plaintext passwords stop here; only
//! bcrypt hashes cross into storage.

use axum::extract::State;
use axum::http::Uri;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use recaudo_core::model::{NewUser, UpdateUser};
use recaudo_core::PageParams;
use recaudo_storage::users as store;
use serde::Deserialize;

use crate::auth::BCRYPT_COST;
use crate::error::{validation, ApiError};
use crate::extract::{Json, Path, Query};
use crate::{envelope, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(by_id).patch(update).delete(delete))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    page: Option<i64>,
    limit: Option<i64>,
}

fn validate_new(new: &NewUser) -> Vec<String> {
    let mut problems = Vec::new();
    if new.first_name.is_empty() {
        problems.push("firstName is required".to_string());
    }
    if new.last_name.is_empty() {
        problems.push("lastName is required".to_string());
    }
    if new.email.is_empty() {
        problems.push("email is required".to_string());
    }
    if new.username.is_empty() {
        problems.push("username is required".to_string());
    }
    if new.password.is_empty() {
        problems.push("password is required".to_string());
    }
    problems
}

async fn create(
    State(state): State<AppState>,
    uri: Uri,
    Json(new): Json<NewUser>,
) -> Response {
    let problems = validate_new(&new);
    if !problems.is_empty() {
        return state.err(validation(problems), &uri);
    }
    let hash = match bcrypt::hash(&new.password, BCRYPT_COST) {
        Ok(hash) => hash,
        Err(err) => return state.err(ApiError::Internal(err.to_string()), &uri),
    };
    match store::create(&state.pool, &new, &hash).await {
        Ok(user) => envelope::created(&uri, user),
        Err(err) => state.err(err, &uri),
    }
}

async fn list(State(state): State<AppState>, uri: Uri, Query(query): Query<ListQuery>) -> Response {
    let params = PageParams::from_query(query.page, query.limit);
    match store::find_all(&state.pool, params).await {
        Ok(page) => envelope::paginated(&uri, page),
        Err(err) => state.err(err, &uri),
    }
}

async fn by_id(State(state): State<AppState>, uri: Uri, Path(id): Path<i32>) -> Response {
    match store::find_by_id(&state.pool, id).await {
        Ok(user) => envelope::ok(&uri, user),
        Err(err) => state.err(err, &uri),
    }
}

async fn update(
    State(state): State<AppState>,
    uri: Uri,
    Path(id): Path<i32>,
    Json(changes): Json<UpdateUser>,
) -> Response {
    let password_hash = match changes.password.as_deref().filter(|p| !p.is_empty()) {
        Some(password) => match bcrypt::hash(password, BCRYPT_COST) {
            Ok(hash) => Some(hash),
            Err(err) => return state.err(ApiError::Internal(err.to_string()), &uri),
        },
        None => None,
    };
    match store::update(&state.pool, id, changes, password_hash).await {
        Ok(user) => envelope::ok_with_message(&uri, envelope::MSG_UPDATED, user),
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
    fn new_user_validation_collects_every_missing_field() {
        let new = NewUser {
            first_name: String::new(),
            last_name: "Rojas".to_string(),
            email: String::new(),
            password: "secret".to_string(),
            username: String::new(),
            profile_image: None,
            channel_id: None,
            role_id: None,
        };
        let problems = validate_new(&new);
        assert_eq!(
            problems,
            vec![
                "firstName is required",
                "email is required",
                "username is required"
            ]
        );
    }
}

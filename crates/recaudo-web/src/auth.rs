//! JWT session handling and the login/me endpoints.
//!
//! Unknown username and wrong password are deliberately indistinguishable
//! to the caller; `/auth/me` separates "user gone" (404) from "account
//! deactivated" (403) from "bad token" (401).

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, Uri};
use axum::middleware::Next;
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use recaudo_core::model::UserView;
use recaudo_storage::users;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::error::{validation, ApiError};
use crate::extract::Json;
use crate::{envelope, AppState};

pub const BCRYPT_COST: u32 = 10;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,
    pub username: String,
    pub exp: i64,
}

pub fn issue_token(config: &AppConfig, user: &UserView) -> Result<String, ApiError> {
    let claims = Claims {
        sub: user.user.id,
        username: user.user.username.clone(),
        exp: Utc::now().timestamp() + config.jwt_ttl_secs,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|err| ApiError::Internal(err.to_string()))
}

pub fn verify_token(config: &AppConfig, token: &str) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::Unauthorized)
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// Router-level bearer check for every route outside `/auth`. `/auth/me`
/// verifies inside the handler instead because it needs the claims.
pub async fn require_auth(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let Some(token) = bearer_token(request.headers()) else {
        return state.err(ApiError::Unauthorized, request.uri());
    };
    if let Err(err) = verify_token(&state.config, token) {
        return state.err(err, request.uri());
    }
    next.run(request).await
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/me", get(me))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    username: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionUser {
    is_active: bool,
    role: Option<String>,
}

#[derive(Debug, Serialize)]
struct SessionResponse {
    access_token: String,
    user: SessionUser,
}

async fn login(
    State(state): State<AppState>,
    uri: Uri,
    Json(body): Json<LoginRequest>,
) -> Response {
    let mut problems = Vec::new();
    if body.username.as_deref().unwrap_or("").is_empty() {
        problems.push("username is required".to_string());
    }
    if body.password.as_deref().unwrap_or("").is_empty() {
        problems.push("password is required".to_string());
    }
    if !problems.is_empty() {
        return state.err(validation(problems), &uri);
    }
    let username = body.username.unwrap_or_default();
    let password = body.password.unwrap_or_default();

    let user = match users::find_by_username(&state.pool, &username).await {
        Ok(user) => user,
        Err(err) if err.is_not_found() => return state.err(ApiError::Unauthorized, &uri),
        Err(err) => return state.err(err, &uri),
    };
    if !bcrypt::verify(&password, &user.user.password).unwrap_or(false) {
        return state.err(ApiError::Unauthorized, &uri);
    }

    let access_token = match issue_token(&state.config, &user) {
        Ok(token) => token,
        Err(err) => return state.err(err, &uri),
    };
    envelope::ok(
        &uri,
        SessionResponse {
            access_token,
            user: SessionUser {
                is_active: user.user.is_active,
                role: user.role,
            },
        },
    )
}

async fn me(State(state): State<AppState>, uri: Uri, headers: HeaderMap) -> Response {
    let Some(token) = bearer_token(&headers) else {
        return state.err(ApiError::Unauthorized, &uri);
    };
    let claims = match verify_token(&state.config, token) {
        Ok(claims) => claims,
        Err(err) => return state.err(err, &uri),
    };
    // Loaded fresh so a deleted or deactivated account is caught even
    // while its token is still valid.
    match users::find_by_id(&state.pool, claims.sub).await {
        Ok(user) if !user.user.is_active => state.err(ApiError::Forbidden, &uri),
        Ok(user) => envelope::ok(&uri, user.profile()),
        Err(err) => state.err(err, &uri),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use recaudo_core::model::User;

    fn test_config(secret: &str) -> AppConfig {
        AppConfig {
            port: 0,
            database_url: String::new(),
            jwt_secret: secret.to_string(),
            jwt_ttl_secs: 3600,
            environment: "test".to_string(),
            report_default_collectors: vec![],
        }
    }

    fn test_user() -> UserView {
        UserView {
            user: User {
                id: 11,
                first_name: "Ana".into(),
                last_name: "Rojas".into(),
                email: "ana@example.com".into(),
                password: "$2b$10$hash".into(),
                profile_image: None,
                username: "arojas".into(),
                is_active: true,
                channel_id: None,
                expiration_password: None,
                flag_password: false,
                dark_mode: false,
                created_at: Utc::now(),
                updated_at: Utc::now(),
                deleted_at: None,
            },
            role: Some("admin".into()),
        }
    }

    #[test]
    fn tokens_round_trip_with_the_same_secret() {
        let config = test_config("s3cret");
        let token = issue_token(&config, &test_user()).unwrap();
        let claims = verify_token(&config, &token).unwrap();
        assert_eq!(claims.sub, 11);
        assert_eq!(claims.username, "arojas");
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn tokens_fail_with_a_different_secret() {
        let token = issue_token(&test_config("one"), &test_user()).unwrap();
        let err = verify_token(&test_config("two"), &token).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[test]
    fn bearer_extraction_requires_the_scheme() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));

        headers.insert(AUTHORIZATION, "Basic abc".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }
}

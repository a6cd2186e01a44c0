//! Uniform response envelope applied to every endpoint.

use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use recaudo_core::Page;
use serde::Serialize;

pub const MSG_OK: &str = "Operacion exitosa";
pub const MSG_CREATED: &str = "Creado exitosamente";
pub const MSG_UPDATED: &str = "Actualizado exitosamente";
pub const MSG_DELETED: &str = "Eliminado exitosamente";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
    pub timestamp: String,
    pub path: String,
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn success<T: Serialize>(status: StatusCode, message: &str, uri: &Uri, data: T) -> Envelope<T> {
    Envelope {
        success: true,
        message: message.to_string(),
        data: Some(data),
        timestamp: timestamp(),
        path: uri.path().to_string(),
        status_code: status.as_u16(),
        total: None,
        page: None,
        limit: None,
        total_pages: None,
        stack: None,
    }
}

pub fn ok<T: Serialize>(uri: &Uri, data: T) -> Response {
    (StatusCode::OK, Json(success(StatusCode::OK, MSG_OK, uri, data))).into_response()
}

pub fn ok_with_message<T: Serialize>(uri: &Uri, message: &str, data: T) -> Response {
    (StatusCode::OK, Json(success(StatusCode::OK, message, uri, data))).into_response()
}

pub fn created<T: Serialize>(uri: &Uri, data: T) -> Response {
    (
        StatusCode::CREATED,
        Json(success(StatusCode::CREATED, MSG_CREATED, uri, data)),
    )
        .into_response()
}

/// Pagination metadata is merged at the top level alongside `data`.
pub fn paginated<T: Serialize>(uri: &Uri, page: Page<T>) -> Response {
    let mut envelope = success(StatusCode::OK, MSG_OK, uri, page.data);
    envelope.total = Some(page.total);
    envelope.page = Some(page.page);
    envelope.limit = Some(page.limit);
    envelope.total_pages = Some(page.total_pages);
    (StatusCode::OK, Json(envelope)).into_response()
}

pub fn error(uri: &Uri, status: StatusCode, message: &str, stack: Option<String>) -> Response {
    let envelope = Envelope::<()> {
        success: false,
        message: message.to_string(),
        data: None,
        timestamp: timestamp(),
        path: uri.path().to_string(),
        status_code: status.as_u16(),
        total: None,
        page: None,
        limit: None,
        total_pages: None,
        stack,
    };
    (status, Json(envelope)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use recaudo_core::PageParams;

    #[test]
    fn success_envelope_carries_path_and_status() {
        let uri: Uri = "/collectors/3".parse().unwrap();
        let envelope = success(StatusCode::OK, MSG_OK, &uri, serde_json::json!({"id": 3}));
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["path"], "/collectors/3");
        assert_eq!(value["statusCode"], 200);
        assert!(value.get("total").is_none());
        assert!(value.get("stack").is_none());
    }

    #[test]
    fn paginated_meta_is_merged_at_top_level() {
        let uri: Uri = "/users".parse().unwrap();
        let page = Page::new(vec![1, 2, 3], 8, PageParams::new(1, 3));
        let mut envelope = success(StatusCode::OK, MSG_OK, &uri, page.data.clone());
        envelope.total = Some(page.total);
        envelope.page = Some(page.page);
        envelope.limit = Some(page.limit);
        envelope.total_pages = Some(page.total_pages);
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["total"], 8);
        assert_eq!(value["totalPages"], 3);
        assert_eq!(value["data"], serde_json::json!([1, 2, 3]));
    }
}

//! HTTP error taxonomy and the single storage-to-envelope mapping point.

use axum::http::{StatusCode, Uri};
use axum::response::Response;
use recaudo_storage::StorageError;
use thiserror::Error;

use crate::envelope;

pub const MSG_UNAUTHORIZED: &str = "No autorizado";
pub const MSG_FORBIDDEN: &str = "Acceso prohibido";
pub const MSG_DUPLICATE: &str =
    "El registro ya existe. Por favor verifique los datos enviados (usuario o correo duplicado)";
pub const MSG_DATABASE: &str = "Error de base de datos";
pub const MSG_VALIDATION: &str = "Error de validacion";
pub const MSG_INTERNAL: &str = "Error interno del servidor";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{MSG_UNAUTHORIZED}")]
    Unauthorized,
    #[error("{MSG_FORBIDDEN}")]
    Forbidden,
    #[error("{MSG_VALIDATION}: {0}")]
    Validation(String),
    #[error("{MSG_DUPLICATE}")]
    Duplicate,
    #[error("{MSG_DATABASE}")]
    Database(#[source] sqlx::Error),
    #[error("{MSG_INTERNAL}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Duplicate => StatusCode::CONFLICT,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Renders the error envelope. The stack (source chain) is attached
    /// only when the environment allows it.
    pub fn into_envelope(self, uri: &Uri, expose_stack: bool) -> Response {
        let status = self.status();
        let message = self.to_string();
        let stack = if expose_stack {
            match &self {
                Self::Database(source) => Some(source.to_string()),
                Self::Internal(detail) => Some(detail.clone()),
                _ => Some(format!("{self:?}")),
            }
        } else {
            None
        };
        if status.is_server_error() {
            tracing::error!(%status, %message, "request failed");
        } else {
            tracing::debug!(%status, %message, "request rejected");
        }
        envelope::error(uri, status, &message, stack)
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { entity, id } => Self::NotFound(format!("{entity} {id} not found")),
            StorageError::Duplicate => Self::Duplicate,
            StorageError::Database(source) => Self::Database(source),
        }
    }
}

/// Concatenates field-level validation messages into the single string
/// the envelope carries.
pub fn validation(messages: Vec<String>) -> ApiError {
    ApiError::Validation(messages.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_map_to_the_right_status() {
        let err: ApiError = StorageError::not_found("collector", 7).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "collector 7 not found");

        let err: ApiError = StorageError::Duplicate.into();
        assert_eq!(err.status(), StatusCode::CONFLICT);

        let err: ApiError = StorageError::Database(sqlx::Error::PoolTimedOut).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), MSG_DATABASE);
    }

    #[test]
    fn validation_messages_concatenate_into_one_string() {
        let err = validation(vec![
            "fromDate is required".to_string(),
            "toDate is required".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Error de validacion: fromDate is required, toDate is required"
        );
    }
}

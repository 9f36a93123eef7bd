use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Classification carried by every error that leaves the service layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    NotFound,
    Conflict,
    Timeout,
    Internal,
}

impl ErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Timeout => StatusCode::REQUEST_TIMEOUT,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(self) -> u16 {
        self.status().as_u16()
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Timeout(String),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        AppError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        AppError::Conflict(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::Internal(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::BadRequest(_) => ErrorKind::BadRequest,
            AppError::Unauthorized(_) => ErrorKind::Unauthorized,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Conflict(_) => ErrorKind::Conflict,
            AppError::Timeout(_) => ErrorKind::Timeout,
            AppError::Config(_)
            | AppError::Io(_)
            | AppError::Database(_)
            | AppError::Migrate(_)
            | AppError::Other(_)
            | AppError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Message safe to hand to a client. Infrastructure failures are reduced
    /// to a generic line; their detail only goes to the log.
    fn public_message(&self) -> String {
        match self {
            AppError::Config(_)
            | AppError::Io(_)
            | AppError::Database(_)
            | AppError::Migrate(_)
            | AppError::Other(_) => "internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        if kind == ErrorKind::Internal {
            error!("request failed: {self:?}");
        }

        let body = json!({
            "error": {
                "code": kind.code(),
                "kind": kind,
                "message": self.public_message(),
            }
        });

        (kind.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_their_status_codes() {
        assert_eq!(ErrorKind::BadRequest.code(), 400);
        assert_eq!(ErrorKind::Unauthorized.code(), 401);
        assert_eq!(ErrorKind::NotFound.code(), 404);
        assert_eq!(ErrorKind::Conflict.code(), 409);
        assert_eq!(ErrorKind::Timeout.code(), 408);
        assert_eq!(ErrorKind::Internal.code(), 500);
    }

    #[test]
    fn display_is_the_bare_message() {
        let err = AppError::not_found("The trip with id abc does not exist");
        assert_eq!(err.to_string(), "The trip with id abc does not exist");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn infrastructure_errors_classify_as_internal() {
        let err = AppError::Config("missing".into());
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.public_message(), "internal server error");
    }

    #[test]
    fn response_carries_structured_code() {
        let response = AppError::conflict("duplicate").into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn anyhow_context_is_internal_and_hidden() {
        let err: AppError = anyhow::anyhow!("bind refused")
            .context("failed to bind 127.0.0.1:3000")
            .into();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.public_message(), "internal server error");
        assert_eq!(err.to_string(), "failed to bind 127.0.0.1:3000");
    }

    #[test]
    fn timeout_keeps_its_message() {
        let err = AppError::Timeout("request took longer than 5s".into());
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert_eq!(err.public_message(), "request took longer than 5s");
        assert_eq!(err.into_response().status(), StatusCode::REQUEST_TIMEOUT);
    }
}

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use service::errors::ServiceError;
use thiserror::Error;
use tracing::{error, info, warn};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCode {
    Invalid,
    Conflict,
    Duplicate,
    NotSupported,
    Exception,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    Info,
    Fatal,
    Error,
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorDescription {
    pub code: ErrorCode,
    pub severity: ErrorSeverity,
    pub message: String,
}

/// HTTP-facing error: a status, a code and the message shown to the client.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        Self { status, code, message: message.into() }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ErrorCode::Invalid, message)
    }

    pub fn not_supported(message: impl Into<String>) -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, ErrorCode::NotSupported, message)
    }

    pub fn description(&self) -> ErrorDescription {
        ErrorDescription { code: self.code, severity: ErrorSeverity::Fatal, message: self.message.clone() }
    }
}

/// Failures that stop the server before it accepts connections.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("migration failed: {0}")]
    Migration(String),
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        let message = e.to_string();
        match e {
            ServiceError::InvalidArgument(_) => Self::invalid(message),
            ServiceError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, ErrorCode::Exception, message),
            ServiceError::DuplicateEntity(_) => Self::new(StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::Duplicate, message),
            ServiceError::NotSupported(_) => Self::not_supported(message),
            ServiceError::Db(_) => Self::new(StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Exception, message),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(r: JsonRejection) -> Self { Self::invalid(r.body_text()) }
}

impl From<QueryRejection> for ApiError {
    fn from(r: QueryRejection) -> Self { Self::invalid(r.body_text()) }
}

impl From<PathRejection> for ApiError {
    fn from(r: PathRejection) -> Self { Self::invalid(r.body_text()) }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status;
        if status.is_server_error() {
            error!(status = %status, error = %self.message, "request failed");
        } else if matches!(self.code, ErrorCode::Duplicate) || status == StatusCode::NOT_FOUND {
            info!(status = %status, code = ?self.code, error = %self.message, "request rejected");
        } else {
            warn!(status = %status, code = ?self.code, error = %self.message, "request rejected");
        }
        (status, Json(self.description())).into_response()
    }
}

//! Unified error handling for the receiver.

use axum::{
    Json,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::db::RepositoryError;

/// Application-level error type for the receiver.
///
/// Authentication and validation failures are terminal per request and
/// returned synchronously; nothing here is retried.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or invalid API key.
    #[error("Unauthorized")]
    Unauthorized,

    /// Required webhook field(s) missing.
    #[error("Missing required field(s): {0}")]
    MissingData(String),

    /// Request body could not be read as JSON.
    #[error("{0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Machine-readable error body returned to callers.
#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl AppError {
    /// Stable machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Database(_) | Self::Internal(_) => "server_error",
            Self::NotFound(_) => "not_found",
            Self::Unauthorized => "unauthorized",
            Self::MissingData(_) => "missing_data",
            Self::BadRequest(_) => "bad_request",
        }
    }
}

/// `Json` extractor whose rejection is rendered through [`AppError`].
///
/// Axum's stock `Json` rejection replies in plain text; routes use this
/// wrapper instead so a malformed body still gets the `{code, message}`
/// shape every other error carries.
#[derive(Debug)]
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::BadRequest(rejection.body_text())),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server faults with full detail before redacting
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            tracing::error!(error = %self, "request failed");
        }

        let status = match &self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::MissingData(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Unauthorized => "Invalid or missing API key".to_string(),
            _ => self.to_string(),
        };

        let body = ErrorBody {
            code: self.code(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

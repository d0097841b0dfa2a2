use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Banner text shown while the service runs without a credential.
pub const MISSING_CREDENTIAL_MESSAGE: &str =
    "🚨 GOOGLE_API_KEY not found! Please set it in your .env file.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Unparseable model replies are not errors here; the assessment interpreter
/// returns them as a `FormatError` value and callers fall back to raw text.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{}", MISSING_CREDENTIAL_MESSAGE)]
    MissingCredential,

    #[error("Completion service error: {0}")]
    Service(#[from] LlmError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Malformed API bodies get the same JSON error shape as every other
/// validation failure instead of axum's plain-text rejection.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl AppError {
    /// Message suitable for an inline banner in the HTML pages.
    pub fn banner(&self) -> String {
        match self {
            AppError::MissingCredential => MISSING_CREDENTIAL_MESSAGE.to_string(),
            AppError::Service(e) => format!("❌ Error: {e}"),
            AppError::Validation(msg) => format!("⚠️ {msg}"),
            AppError::NotFound(msg) => format!("⚠️ {msg}"),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingCredential => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Service(_) => StatusCode::BAD_GATEWAY,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, message) = match &self {
            AppError::MissingCredential => ("CONFIG_ERROR", self.to_string()),
            AppError::Service(e) => {
                tracing::error!("Completion service error: {e}");
                ("SERVICE_ERROR", e.to_string())
            }
            AppError::Validation(msg) => ("VALIDATION_ERROR", msg.clone()),
            AppError::NotFound(msg) => ("NOT_FOUND", msg.clone()),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (self.status(), body).into_response()
    }
}

//! The `{ success, data, message, errors }` response envelope.

use reqwest::StatusCode;
use serde::Deserialize;

use menuadmin_core::error::{AppError, ErrorKind, FieldErrors};

/// Body of every backend response.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Whether the backend accepted the request.
    #[serde(default = "default_success")]
    pub success: bool,
    /// Payload. Absent for bodies that carry only a message.
    pub data: Option<T>,
    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,
    /// Field-indexed validation messages.
    #[serde(default)]
    pub errors: Option<FieldErrors>,
}

fn default_success() -> bool {
    true
}

impl<T> ApiEnvelope<T> {
    /// The error described by a `success: false` body.
    pub fn into_error(self, status: StatusCode) -> AppError {
        error_for_status(status, self.message, self.errors.unwrap_or_default())
    }
}

/// Map an HTTP status and envelope details to an [`AppError`].
///
/// A 2xx status with `success: false` is a rejected request: validation
/// when field messages are present, conflict otherwise.
pub fn error_for_status(status: StatusCode, message: Option<String>, errors: FieldErrors) -> AppError {
    let kind = match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ErrorKind::Validation,
        StatusCode::UNAUTHORIZED => ErrorKind::Authentication,
        StatusCode::FORBIDDEN => ErrorKind::Authorization,
        StatusCode::NOT_FOUND => ErrorKind::NotFound,
        StatusCode::CONFLICT => ErrorKind::Conflict,
        s if s.is_success() && !errors.is_empty() => ErrorKind::Validation,
        s if s.is_success() => ErrorKind::Conflict,
        _ => ErrorKind::Transport,
    };
    let message = message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| match status.canonical_reason() {
            Some(reason) => format!("{} {reason}", status.as_u16()),
            None => format!("HTTP {}", status.as_u16()),
        });
    AppError::new(kind, message).with_field_errors(errors)
}

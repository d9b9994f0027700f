//! JSON error responses.
//!
//! Every handler returns `Result<_, ApiError>`. Client-facing categories
//! expose their message; store faults are logged and answered with a
//! generic message so SQL or connection details never reach the caller.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use crate::config::Locale;
use crate::db::StoreError;
use crate::services::chat::ChatError;
use crate::services::users::UserError;

pub const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unauthorized(String),
    /// Provider failure, already rendered in the caller's locale.
    #[error("{0}")]
    Upstream(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Map a chat service error, rendering provider failures in `locale`.
    #[must_use]
    pub fn from_chat(err: ChatError, locale: Locale) -> Self {
        match err {
            ChatError::Validation(m) => Self::BadRequest(m),
            ChatError::ChatNotFound(_) => Self::NotFound("Chat not found".into()),
            ChatError::Completion(e) => Self::Upstream(e.user_message(locale)),
            ChatError::Store(e) => e.into(),
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Upstream(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UsernameTaken(name) => Self::Conflict(format!("Username {name} is already taken")),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Validation(m) => Self::BadRequest(m),
            UserError::UsernameTaken(name) => Self::Conflict(format!("Username {name} is already taken")),
            UserError::InvalidCredentials => Self::Unauthorized("Invalid username or password".into()),
            UserError::Hashing(detail) => Self::Internal(detail),
            UserError::Store(e) => e.into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::Internal(detail) => {
                error!(error = %detail, "request failed");
                INTERNAL_MESSAGE.to_owned()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;

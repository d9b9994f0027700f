//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the JSON API under `/api` plus a health probe. Handlers
//! decode requests, call into `services`, and map service errors through
//! [`error::ApiError`] so every failure leaves as `{"message": ...}`.

pub mod chats;
pub mod error;
pub mod messages;
pub mod users;

#[cfg(test)]
mod test_support;

use std::convert::Infallible;

use axum::Router;
use axum::extract::{FromRequestParts, State};
use axum::http::header::ACCEPT_LANGUAGE;
use axum::http::request::Parts;
use axum::response::Json;
use axum::routing::{get, post};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Locale;
use crate::state::AppState;

use self::error::ApiError;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/chats", get(chats::list_chats).post(chats::create_chat))
        .route("/api/chats/{id}", get(chats::get_chat))
        .route("/api/chats/{id}/messages", get(messages::list_messages))
        .route("/api/messages", post(messages::create_message))
        .route("/api/messages/{id}", get(messages::get_message))
        .route("/api/chat", post(chats::post_chat_message))
        .route("/api/register", post(users::register))
        .route("/api/login", post(users::login))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Locale for user-facing messages: the first supported language in
/// `Accept-Language`, else the configured default.
#[derive(Debug, Clone, Copy)]
pub struct RequestLocale(pub Locale);

impl FromRequestParts<AppState> for RequestLocale {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let locale = parts
            .headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok())
            .and_then(Locale::from_accept_language)
            .unwrap_or(state.locale);
        Ok(Self(locale))
    }
}

/// Parse an integer path id, answering 400 with `message` otherwise.
pub(crate) fn parse_id(raw: &str, message: &str) -> Result<i64, ApiError> {
    raw.trim().parse().map_err(|_| ApiError::BadRequest(message.to_owned()))
}

async fn healthz(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "storage": state.store.backend(),
        "llm": state.llm.as_ref().map(|llm| llm.model()),
    }))
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

//! Registration and credential check routes.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;

use super::error::ApiError;
use crate::db::User;
use crate::services::users;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CredentialsBody {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// `POST /api/register`: 201 with the new user.
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<CredentialsBody>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let Json(body) = body?;
    let user = users::register_user(&state, body.username.as_deref(), body.password.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// `POST /api/login`: Verify credentials and return the user.
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<CredentialsBody>, JsonRejection>,
) -> Result<Json<User>, ApiError> {
    let Json(body) = body?;
    let user = users::login(&state, body.username.as_deref(), body.password.as_deref()).await?;
    Ok(Json(user))
}

#[cfg(test)]
#[path = "users_test.rs"]
mod tests;

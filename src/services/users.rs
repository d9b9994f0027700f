//! User registration and credential checks.
//!
//! Passwords are stored as bcrypt hashes. Hashing and verification run on
//! the blocking pool so they never stall the async executor.

use tracing::info;

use crate::db::{StoreError, User};
use crate::state::AppState;

pub const USERNAME_MAX_CHARS: usize = 64;
pub const PASSWORD_MIN_CHARS: usize = 6;

/// Debug builds use the minimum cost so tests stay fast.
pub const BCRYPT_COST: u32 = if cfg!(debug_assertions) { 4 } else { bcrypt::DEFAULT_COST };

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("{0}")]
    Validation(String),
    #[error("username already taken: {0}")]
    UsernameTaken(String),
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error("store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for UserError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UsernameTaken(name) => Self::UsernameTaken(name),
            other => Self::Store(other),
        }
    }
}

/// Hash a password with a fresh bcrypt salt.
///
/// # Errors
///
/// Returns [`UserError::Hashing`] if bcrypt rejects the input.
pub fn hash_password(password: &str) -> Result<String, UserError> {
    bcrypt::hash(password, BCRYPT_COST).map_err(|e| UserError::Hashing(e.to_string()))
}

/// Check `password` against a stored bcrypt hash. Malformed hashes never match.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    bcrypt::verify(password, stored).unwrap_or(false)
}

async fn hash_password_blocking(password: String) -> Result<String, UserError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| UserError::Hashing(e.to_string()))?
}

async fn verify_password_blocking(password: String, stored: String) -> bool {
    tokio::task::spawn_blocking(move || verify_password(&password, &stored))
        .await
        .unwrap_or(false)
}

fn validate(username: Option<&str>, password: Option<&str>) -> Result<(String, String), UserError> {
    let username = username.map(str::trim).unwrap_or_default();
    if username.is_empty() {
        return Err(UserError::Validation("username is required".into()));
    }
    if username.chars().count() > USERNAME_MAX_CHARS {
        return Err(UserError::Validation(format!(
            "username must be at most {USERNAME_MAX_CHARS} characters"
        )));
    }
    let password = password.unwrap_or_default();
    if password.chars().count() < PASSWORD_MIN_CHARS {
        return Err(UserError::Validation(format!(
            "password must be at least {PASSWORD_MIN_CHARS} characters"
        )));
    }
    Ok((username.to_string(), password.to_string()))
}

/// Register a new user with a hashed password.
///
/// # Errors
///
/// Returns a validation error for a blank or overlong username or a short
/// password, [`UserError::UsernameTaken`] on a duplicate, or a store error.
pub async fn register_user(
    state: &AppState,
    username: Option<&str>,
    password: Option<&str>,
) -> Result<User, UserError> {
    let (username, password) = validate(username, password)?;
    let user = state
        .store
        .create_user(&username, &hash_password_blocking(password).await?)
        .await?;
    info!(user_id = user.id, "users: registered");
    Ok(user)
}

/// Look up a user by name and check the password. No session is issued.
///
/// # Errors
///
/// Returns [`UserError::InvalidCredentials`] when the user is unknown or the
/// password does not match, or a store error.
pub async fn login(state: &AppState, username: Option<&str>, password: Option<&str>) -> Result<User, UserError> {
    let (Some(username), Some(password)) = (username.map(str::trim), password) else {
        return Err(UserError::Validation("username and password are required".into()));
    };
    let user = state
        .store
        .get_user_by_username(username)
        .await?
        .ok_or(UserError::InvalidCredentials)?;
    if !verify_password_blocking(password.to_owned(), user.password.clone()).await {
        return Err(UserError::InvalidCredentials);
    }
    info!(user_id = user.id, "users: credentials verified");
    Ok(user)
}

#[cfg(test)]
#[path = "users_test.rs"]
mod tests;

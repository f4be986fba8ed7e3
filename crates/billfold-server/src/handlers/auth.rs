//! Registration and login handlers
//!
//! Passwords are hashed with Argon2id; the hash never leaves the users
//! table and the core never sees plaintext credentials.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{AppError, AppState};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub user_id: i64,
}

/// POST /api/register - create a new user
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    let username = req.username.trim();
    if username.is_empty() {
        return Err(AppError::bad_request("Username must not be empty"));
    }
    if req.password.is_empty() {
        return Err(AppError::bad_request("Password must not be empty"));
    }

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| AppError::internal(&format!("Failed to hash password: {}", e)))?
        .to_string();

    let user_id = state.db.create_user(username, &hash)?;
    info!(user_id, username, "Registered user");

    Ok(Json(RegisterResponse { user_id }))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub user_id: i64,
    /// True when no budget profile exists yet for this user
    pub needs_onboarding: bool,
}

/// POST /api/login - verify credentials
///
/// Returns the user id for the client to present on subsequent calls,
/// plus whether onboarding is still pending.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = state
        .db
        .get_user_by_username(req.username.trim())?
        .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|e| AppError::internal(&format!("Stored password hash is invalid: {}", e)))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::unauthorized("Invalid credentials"))?;

    let needs_onboarding = state.db.get_profile(user.id)?.is_none();

    Ok(Json(LoginResponse {
        user_id: user.id,
        needs_onboarding,
    }))
}

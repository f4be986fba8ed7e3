//! API request handlers
//!
//! Organized by concern:
//! - `auth` - registration and login
//! - `profile` - onboarding and budget profile lookup
//! - `dashboard` - budget-vs-spend reconciliation
//! - `expenses` - receipt upload and ledger listing

mod auth;
mod dashboard;
mod expenses;
mod profile;

pub use auth::{login, register};
pub use dashboard::get_dashboard;
pub use expenses::{list_expenses, upload_receipt};
pub use profile::{get_profile, onboard};

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use billfold_core::extract::ExtractorBackend;

use crate::{AppError, AppState};

/// Response for the /api/health endpoint
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub extractor_host: String,
    pub extractor_model: String,
    pub extractor_healthy: bool,
}

/// GET /api/health - database and extraction backend status
pub async fn health(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HealthResponse>, AppError> {
    // A pool checkout proves the database is reachable
    state.db.conn().map_err(AppError::from)?;

    Ok(Json(HealthResponse {
        status: "ok",
        extractor_host: state.extractor.host().to_string(),
        extractor_model: state.extractor.model().to_string(),
        extractor_healthy: state.extractor.health_check().await,
    }))
}

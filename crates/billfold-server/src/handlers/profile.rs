//! Onboarding and budget profile handlers

use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, Json};
use serde::Deserialize;
use tracing::info;

use billfold_core::{BudgetProfile, Error as CoreError};

use crate::{require_user, AppError, AppState, SuccessResponse};

/// Onboarding submission: income plus one allocation per category
#[derive(Debug, Deserialize)]
pub struct OnboardRequest {
    pub income: f64,
    pub rent: f64,
    pub food: f64,
    pub clothing: f64,
    pub electronics: f64,
    pub travel: f64,
    pub medical: f64,
    pub other: f64,
}

/// POST /api/onboard - store the budget profile
///
/// Full-replace semantics: re-submitting overwrites the previous
/// profile wholesale, so the operation is idempotent.
pub async fn onboard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<OnboardRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    let user_id = require_user(&headers)?;

    let profile = BudgetProfile {
        user_id,
        income: req.income,
        budget_rent: req.rent,
        budget_food: req.food,
        budget_clothing: req.clothing,
        budget_electronics: req.electronics,
        budget_travel: req.travel,
        budget_medical: req.medical,
        budget_other: req.other,
    };
    state.db.upsert_profile(&profile)?;
    info!(user_id, "Stored budget profile");

    Ok(Json(SuccessResponse { success: true }))
}

/// GET /api/profile - fetch the budget profile
///
/// A 404 with `needs_onboarding: true` tells the client to run the
/// onboarding flow first.
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<BudgetProfile>, AppError> {
    let user_id = require_user(&headers)?;

    let profile = state
        .db
        .get_profile(user_id)?
        .ok_or(CoreError::ProfileNotFound(user_id))?;

    Ok(Json(profile))
}

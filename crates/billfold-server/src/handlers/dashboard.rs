//! Dashboard handler

use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, Json};

use billfold_core::{reconcile, DashboardReport};

use crate::{require_user, AppError, AppState};

/// GET /api/dashboard - budget vs spend per category
///
/// Returns the profile plus one row per category in canonical order.
/// Missing profile surfaces as 404 with the onboarding signal.
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<DashboardReport>, AppError> {
    let user_id = require_user(&headers)?;

    let report = reconcile(&state.db, user_id)?;

    Ok(Json(report))
}

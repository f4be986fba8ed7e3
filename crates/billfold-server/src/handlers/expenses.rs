//! Receipt upload and expense listing handlers

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::HeaderMap,
    Json,
};
use serde::Serialize;

use billfold_core::{Expense, ReceiptUpload};

use crate::{require_user, AppError, AppState};

/// Response for a successful receipt ingestion
#[derive(Serialize)]
pub struct IngestResponse {
    pub expense: Expense,
}

/// POST /api/receipts - upload a receipt image for ingestion
///
/// Expects a multipart form with a `file` field. The pipeline persists
/// the image before extraction, so a failed extraction still leaves the
/// original on disk; the response then carries the typed failure and no
/// expense is created.
pub async fn upload_receipt(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<IngestResponse>, AppError> {
    let user_id = require_user(&headers)?;

    let mut upload: Option<ReceiptUpload> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::bad_request("Invalid multipart body or file too large (max 10MB)"))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("receipt").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|_| AppError::bad_request("Invalid multipart body or file too large (max 10MB)"))?;

        upload = Some(ReceiptUpload {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
        break;
    }

    let expense = state.pipeline.ingest(user_id, upload).await?;

    Ok(Json(IngestResponse { expense }))
}

/// GET /api/expenses - list the user's expenses, newest first
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Expense>>, AppError> {
    let user_id = require_user(&headers)?;

    let expenses = state.db.list_expenses(user_id)?;

    Ok(Json(expenses))
}

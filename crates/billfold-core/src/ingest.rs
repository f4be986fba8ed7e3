//! Receipt ingestion pipeline
//!
//! Orchestrates one upload end to end: persist the raw image, call the
//! extraction backend, validate the answer, commit the expense. All
//! failure and rollback decisions live here.
//!
//! Ordering is deliberate and must not change: the image write strictly
//! precedes the extraction call, which strictly precedes the ledger
//! write. A failed extraction therefore never loses the original
//! evidence, and the extraction call never runs inside an open database
//! transaction.

use chrono::Utc;
use tracing::{info, warn};

use crate::candidate;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::extract::{ExtractorBackend, ExtractorClient};
use crate::models::{Expense, NewExpense, ReceiptUpload};
use crate::store::ReceiptStore;

/// The receipt-to-ledger pipeline
///
/// Side effects per call: exactly one durable image write always,
/// exactly one durable expense write only on full success. Images
/// orphaned by failed extractions are kept and never rolled back.
#[derive(Clone)]
pub struct IngestionPipeline {
    db: Database,
    extractor: ExtractorClient,
    store: ReceiptStore,
}

impl IngestionPipeline {
    pub fn new(db: Database, extractor: ExtractorClient, store: ReceiptStore) -> Self {
        Self {
            db,
            extractor,
            store,
        }
    }

    /// Ingest one uploaded receipt for a user
    ///
    /// Concurrent ingestions are independent: each inserts a new row,
    /// so no lock is taken on the profile or the ledger.
    pub async fn ingest(&self, user_id: i64, upload: Option<ReceiptUpload>) -> Result<Expense> {
        let upload = match upload {
            Some(u) if !u.bytes.is_empty() => u,
            _ => return Err(Error::NoFileProvided),
        };

        // Evidence first: the image must be durable before the external
        // call is attempted.
        let stored = self.store.save(&upload.file_name, &upload.bytes)?;

        let raw_text = match self
            .extractor
            .extract(&upload.bytes, &upload.content_type)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!(user_id, image = %stored.path, error = %e, "Extraction failed, image retained");
                return Err(e);
            }
        };

        let candidate = match candidate::normalize(&raw_text) {
            Ok(c) => c,
            Err(e) => {
                warn!(user_id, image = %stored.path, error = %e, "Extraction output rejected, image retained");
                return Err(e.into());
            }
        };

        let occurred_at = Utc::now();
        let id = self.db.insert_expense(&NewExpense {
            user_id,
            category: candidate.category,
            amount: candidate.amount,
            description: candidate.description.clone(),
            occurred_at,
            image_path: Some(stored.path.clone()),
            image_hash: Some(stored.content_hash.clone()),
        })?;

        info!(
            user_id,
            expense_id = id,
            category = %candidate.category,
            amount = candidate.amount,
            "Ingested receipt"
        );

        Ok(Expense {
            id,
            user_id,
            category: candidate.category,
            amount: candidate.amount,
            description: candidate.description,
            occurred_at,
            image_path: Some(stored.path),
            image_hash: Some(stored.content_hash),
            created_at: occurred_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ExtractionFailureKind, ValidationError};
    use crate::extract::MockExtractor;
    use crate::models::Category;

    fn pipeline_with(extractor: MockExtractor) -> (IngestionPipeline, tempfile::TempDir) {
        let db = Database::in_memory().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let store = ReceiptStore::new(dir.path());
        (
            IngestionPipeline::new(db, ExtractorClient::Mock(extractor), store),
            dir,
        )
    }

    fn upload() -> Option<ReceiptUpload> {
        Some(ReceiptUpload {
            file_name: "bill.jpg".into(),
            content_type: "image/jpeg".into(),
            bytes: vec![0xFF, 0xD8, 0xFF],
        })
    }

    fn user_for(pipeline: &IngestionPipeline) -> i64 {
        pipeline.db.create_user("alice", "hash").unwrap()
    }

    #[tokio::test]
    async fn test_missing_upload_rejected() {
        let (pipeline, _dir) = pipeline_with(MockExtractor::new());
        let user_id = user_for(&pipeline);

        let err = pipeline.ingest(user_id, None).await.unwrap_err();
        assert!(matches!(err, Error::NoFileProvided));

        let empty = ReceiptUpload {
            file_name: "bill.jpg".into(),
            content_type: "image/jpeg".into(),
            bytes: vec![],
        };
        let err = pipeline.ingest(user_id, Some(empty)).await.unwrap_err();
        assert!(matches!(err, Error::NoFileProvided));
    }

    #[tokio::test]
    async fn test_success_creates_one_expense() {
        let extractor = MockExtractor::with_response(
            r#"{"amount": 42.50, "category": "food", "description": "Grocery"}"#,
        );
        let (pipeline, _dir) = pipeline_with(extractor);
        let user_id = user_for(&pipeline);

        let expense = pipeline.ingest(user_id, upload()).await.unwrap();
        assert_eq!(expense.category, Category::Food);
        assert_eq!(expense.amount, 42.50);
        assert_eq!(expense.description, "Grocery");

        let image_path = expense.image_path.clone().unwrap();
        assert!(std::path::Path::new(&image_path).exists());

        // Content hash of the upload travels onto the ledger row
        use sha2::{Digest, Sha256};
        let expected_hash = hex::encode(Sha256::digest([0xFF, 0xD8, 0xFF]));
        assert_eq!(expense.image_hash.as_deref(), Some(expected_hash.as_str()));

        let stored = pipeline.db.list_expenses(user_id).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, expense.id);
        assert_eq!(stored[0].category, Category::Food);
        assert_eq!(stored[0].image_hash, expense.image_hash);
    }

    #[tokio::test]
    async fn test_malformed_answer_keeps_image_writes_nothing() {
        let extractor = MockExtractor::with_response("not json");
        let (pipeline, dir) = pipeline_with(extractor);
        let user_id = user_for(&pipeline);

        let err = pipeline.ingest(user_id, upload()).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::MalformedPayload)
        ));

        // No ledger write, but the evidence survives
        assert!(pipeline.db.list_expenses(user_id).unwrap().is_empty());
        let saved: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(saved.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_category_writes_nothing() {
        let extractor = MockExtractor::with_response(
            r#"{"amount": 10, "category": "Toys", "description": "x"}"#,
        );
        let (pipeline, _dir) = pipeline_with(extractor);
        let user_id = user_for(&pipeline);

        let err = pipeline.ingest(user_id, upload()).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::UnknownCategory(_))
        ));
        assert!(pipeline.db.list_expenses(user_id).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_service_failure_keeps_image() {
        let (pipeline, dir) = pipeline_with(MockExtractor::failing());
        let user_id = user_for(&pipeline);

        let err = pipeline.ingest(user_id, upload()).await.unwrap_err();
        assert!(matches!(
            err,
            Error::ExtractionFailed {
                kind: ExtractionFailureKind::Transient,
                ..
            }
        ));
        assert!(err.is_retryable());

        assert!(pipeline.db.list_expenses(user_id).unwrap().is_empty());
        let saved: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(saved.len(), 1);
    }
}

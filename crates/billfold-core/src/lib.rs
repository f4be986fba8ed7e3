//! Billfold Core Library
//!
//! Shared functionality for the Billfold budget tracker:
//! - Database access and migrations (users, budget profiles, expenses)
//! - Receipt image storage with collision-safe naming
//! - Pluggable extraction backends (Ollama vision endpoint, mock)
//! - Extraction result validation against the category taxonomy
//! - Receipt-to-ledger ingestion pipeline
//! - Budget reconciliation engine for the dashboard

pub mod candidate;
pub mod db;
pub mod error;
pub mod extract;
pub mod ingest;
pub mod models;
pub mod reconcile;
pub mod store;

pub use candidate::normalize;
pub use db::Database;
pub use error::{Error, ExtractionFailureKind, Result, ValidationError};
pub use extract::{ExtractorBackend, ExtractorClient, MockExtractor, OllamaExtractor};
pub use ingest::IngestionPipeline;
pub use models::{
    BudgetProfile, Category, CategoryStat, DashboardReport, Expense, ExpenseCandidate, NewExpense,
    ReceiptUpload, User,
};
pub use reconcile::reconcile;
pub use store::{ReceiptStore, StoredReceipt};

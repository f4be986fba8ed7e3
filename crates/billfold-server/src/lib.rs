//! Billfold Web Server
//!
//! Axum-based REST API for the Billfold budget tracker.
//!
//! Identity model: the core takes an explicit user id on every call.
//! This layer reads it from the `x-user-id` header, which a fronting
//! auth proxy (or the client, after login) is expected to set. Protected
//! routes without the header are rejected; register and login are
//! public.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{error, info, warn};

use billfold_core::extract::{ExtractorBackend, ExtractorClient};
use billfold_core::{Database, Error as CoreError, IngestionPipeline, ReceiptStore};

mod handlers;

/// Maximum receipt upload size (10 MB)
pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Header carrying the authenticated user id
const USER_ID_HEADER: &str = "x-user-id";

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub extractor: ExtractorClient,
    pub pipeline: IngestionPipeline,
}

/// Extract the authenticated user id from request headers
///
/// Absence means the fronting auth layer let an anonymous request
/// through, which is this caller's unauthorized condition.
pub(crate) fn require_user(headers: &HeaderMap) -> Result<i64, AppError> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<i64>().ok())
        .ok_or_else(|| AppError::unauthorized("Authentication required"))
}

/// Success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Create the application router
pub fn create_router(
    db: Database,
    extractor: ExtractorClient,
    uploads_dir: impl Into<std::path::PathBuf>,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> Router {
    let store = ReceiptStore::new(uploads_dir);
    let pipeline = IngestionPipeline::new(db.clone(), extractor.clone(), store);

    let state = Arc::new(AppState {
        db,
        extractor,
        pipeline,
    });

    let api_routes = Router::new()
        // Accounts
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        // Onboarding
        .route("/onboard", post(handlers::onboard))
        .route("/profile", get(handlers::get_profile))
        // Dashboard
        .route("/dashboard", get(handlers::get_dashboard))
        // Receipt ingestion and the ledger
        .route("/receipts", post(handlers::upload_receipt))
        .route("/expenses", get(handlers::list_expenses))
        // Health
        .route("/health", get(handlers::health));

    // Build CORS layer. The user id header must be allowed or browser
    // preflights reject every authenticated cross-origin request.
    let allowed_headers = [
        header::CONTENT_TYPE,
        HeaderName::from_static(USER_ID_HEADER),
    ];
    let cors = if config.allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(allowed_headers)
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(allowed_headers)
    };

    let mut app = Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Serve static files if directory provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server
pub async fn serve(
    db: Database,
    extractor: ExtractorClient,
    host: &str,
    port: u16,
    uploads_dir: &std::path::Path,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    check_extractor_connection(&extractor).await;

    let app = create_router(db, extractor, uploads_dir, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Check and log extraction backend connection status
async fn check_extractor_connection(extractor: &ExtractorClient) {
    if extractor.health_check().await {
        info!(
            "Extraction backend connected: {} (model: {})",
            extractor.host(),
            extractor.model()
        );
    } else {
        warn!(
            "Extraction backend not responding: {} (model: {}) - receipt ingestion will fail until it is reachable",
            extractor.host(),
            extractor.model()
        );
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    /// Extra fields merged into the JSON error body
    extra: Option<serde_json::Value>,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }

    pub fn unauthorized(msg: &str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, msg)
    }

    pub fn not_found(msg: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, msg)
    }

    pub fn conflict(msg: &str) -> Self {
        Self::new(StatusCode::CONFLICT, msg)
    }

    pub fn internal(msg: &str) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    fn new(status: StatusCode, msg: &str) -> Self {
        Self {
            status,
            message: msg.to_string(),
            extra: None,
            internal: None,
        }
    }

    fn with_extra(mut self, extra: serde_json::Value) -> Self {
        self.extra = Some(extra);
        self
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let mut body = serde_json::json!({
            "error": self.message
        });
        if let (Some(obj), Some(serde_json::Value::Object(extra))) =
            (body.as_object_mut(), self.extra)
        {
            obj.extend(extra);
        }

        (self.status, Json(body)).into_response()
    }
}

impl From<CoreError> for AppError {
    /// Map core failures to HTTP statuses
    ///
    /// The split matters to clients: 5xx means the dependency is down
    /// and the whole ingestion may be retried; 4xx means the input is
    /// bad and must be corrected first.
    fn from(err: CoreError) -> Self {
        use billfold_core::ExtractionFailureKind;

        match err {
            CoreError::NoFileProvided => AppError::bad_request("No file provided"),
            CoreError::Validation(ref v) => {
                AppError::new(StatusCode::UNPROCESSABLE_ENTITY, &v.to_string())
            }
            CoreError::ExtractionFailed { kind, ref message } => {
                let status = match kind {
                    ExtractionFailureKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
                    ExtractionFailureKind::Transient => StatusCode::BAD_GATEWAY,
                };
                AppError::new(status, &format!("Extraction service failed: {}", message))
            }
            CoreError::ProfileNotFound(_) => {
                AppError::not_found("No budget profile; onboarding required")
                    .with_extra(serde_json::json!({ "needs_onboarding": true }))
            }
            CoreError::DuplicateUser(ref name) => {
                AppError::conflict(&format!("Username already taken: {}", name))
            }
            CoreError::NotFound(ref msg) => AppError::not_found(msg),
            other => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                // Return generic message to client
                message: "An internal error occurred".to_string(),
                extra: None,
                // Keep full error for logging
                internal: Some(other.into()),
            },
        }
    }
}

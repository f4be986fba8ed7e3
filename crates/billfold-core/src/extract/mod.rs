//! Receipt extraction backend abstraction
//!
//! Wraps the external document-understanding call: image bytes plus a
//! fixed instruction go out, free-form text comes back. Parsing and
//! validation of that text belong to the `candidate` module, not here.
//!
//! # Architecture
//!
//! - `ExtractorBackend` trait: the extraction interface
//! - `ExtractorClient` enum: concrete wrapper providing Clone +
//!   compile-time dispatch
//! - Backend implementations: `OllamaExtractor`, `MockExtractor`
//!
//! # Configuration
//!
//! Environment variables (read once at startup via `from_env`):
//! - `OLLAMA_HOST`: vision endpoint URL (mock backend if unset)
//! - `OLLAMA_MODEL`: model name (default: llava)
//! - `BILLFOLD_EXTRACT_TIMEOUT_SECS`: request deadline (default: 60)

mod mock;
mod ollama;

pub use mock::MockExtractor;
pub use ollama::OllamaExtractor;

use async_trait::async_trait;

use crate::error::Result;

/// Fixed instruction sent with every receipt image
///
/// Asks for a minimal three-field JSON object and forbids any other
/// framing; the model may still wrap its answer in code fences, which
/// the validator strips.
pub const EXTRACTION_PROMPT: &str = "\
Analyze this receipt image. Extract:
1. The total amount paid.
2. The spending category: one of Rent, Food, Clothing, Electronics, Travel, Medical, Other.
3. The merchant name as a short description.
Return ONLY a raw JSON object with exactly these keys and nothing else:
{\"amount\": 0.0, \"category\": \"String\", \"description\": \"String\"}";

/// Trait defining the extraction interface
///
/// Implementations send the image and instruction as a single request
/// and return the service's raw text answer. No retries happen here;
/// retry policy belongs to the caller.
#[async_trait]
pub trait ExtractorBackend: Send + Sync {
    /// Send a receipt image and return the raw text answer
    async fn extract(&self, image_bytes: &[u8], mime_type: &str) -> Result<String>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Get the model name (for logging)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete extractor client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum ExtractorClient {
    /// Ollama-style vision endpoint (HTTP API)
    Ollama(OllamaExtractor),
    /// Mock backend for testing and AI-less development
    Mock(MockExtractor),
}

impl ExtractorClient {
    /// Create an extractor from environment variables
    ///
    /// Returns the Ollama backend when `OLLAMA_HOST` is set, otherwise
    /// None. This is a startup convenience only; the resulting client is
    /// passed explicitly everywhere it is used.
    pub fn from_env() -> Option<Self> {
        OllamaExtractor::from_env().map(ExtractorClient::Ollama)
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        ExtractorClient::Mock(MockExtractor::new())
    }
}

#[async_trait]
impl ExtractorBackend for ExtractorClient {
    async fn extract(&self, image_bytes: &[u8], mime_type: &str) -> Result<String> {
        match self {
            ExtractorClient::Ollama(b) => b.extract(image_bytes, mime_type).await,
            ExtractorClient::Mock(b) => b.extract(image_bytes, mime_type).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            ExtractorClient::Ollama(b) => b.health_check().await,
            ExtractorClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            ExtractorClient::Ollama(b) => b.model(),
            ExtractorClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            ExtractorClient::Ollama(b) => b.host(),
            ExtractorClient::Mock(b) => b.host(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_client_identity() {
        let client = ExtractorClient::mock();
        assert_eq!(client.model(), "mock");
        assert_eq!(client.host(), "mock://localhost");
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        let client = ExtractorClient::mock();
        assert!(client.health_check().await);
    }
}

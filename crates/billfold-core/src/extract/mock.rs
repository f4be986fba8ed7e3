//! Mock backend for testing
//!
//! Returns a canned answer for every extraction call, or a forced
//! failure. Useful for unit tests and development without a running
//! vision model.

use async_trait::async_trait;

use crate::error::{Error, ExtractionFailureKind, Result};

use super::ExtractorBackend;

/// Mock extraction backend
#[derive(Clone)]
pub struct MockExtractor {
    response: String,
    fail: bool,
    /// Whether health_check should return true
    pub healthy: bool,
}

impl Default for MockExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl MockExtractor {
    /// Create a mock that answers with a well-formed, fenced payload
    pub fn new() -> Self {
        Self {
            response: "```json\n{\"amount\": 12.34, \"category\": \"Food\", \"description\": \"Mock Grocer\"}\n```"
                .to_string(),
            fail: false,
            healthy: true,
        }
    }

    /// Create a mock that answers with the given text
    pub fn with_response(response: &str) -> Self {
        Self {
            response: response.to_string(),
            fail: false,
            healthy: true,
        }
    }

    /// Create a mock whose extract call always fails as transient
    pub fn failing() -> Self {
        Self {
            response: String::new(),
            fail: true,
            healthy: false,
        }
    }
}

#[async_trait]
impl ExtractorBackend for MockExtractor {
    async fn extract(&self, _image_bytes: &[u8], _mime_type: &str) -> Result<String> {
        if self.fail {
            return Err(Error::ExtractionFailed {
                kind: ExtractionFailureKind::Transient,
                message: "mock extraction failure".to_string(),
            });
        }
        Ok(self.response.clone())
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}

//! Ollama backend implementation
//!
//! HTTP client for an Ollama-style vision endpoint. The image travels
//! base64-encoded alongside the fixed instruction prompt in a single
//! non-streaming generate call.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, ExtractionFailureKind, Result};

use super::{ExtractorBackend, EXTRACTION_PROMPT};

/// Default request deadline for the extraction call
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Ollama-backed receipt extractor
///
/// Credentials and model handle are fixed at construction and never
/// re-read from the environment during a call.
#[derive(Clone)]
pub struct OllamaExtractor {
    http_client: Client,
    base_url: String,
    model: String,
}

impl OllamaExtractor {
    /// Create a new extractor with an explicit request timeout
    ///
    /// Fails if the HTTP client cannot be constructed; there is no
    /// fallback client because it would silently lose the deadline.
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    /// Create from environment variables
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("OLLAMA_HOST").ok()?;
        let model = std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llava".to_string());
        let timeout = std::env::var("BILLFOLD_EXTRACT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        match Self::new(&host, &model, Duration::from_secs(timeout)) {
            Ok(extractor) => Some(extractor),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to build extraction HTTP client");
                None
            }
        }
    }
}

/// Request to the Ollama generate API with an attached image
#[derive(Debug, Serialize)]
struct OllamaVisionRequest {
    model: String,
    prompt: String,
    images: Vec<String>,
    stream: bool,
}

/// Response from the Ollama generate API
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

fn request_error(e: reqwest::Error) -> Error {
    let kind = if e.is_timeout() {
        ExtractionFailureKind::Timeout
    } else {
        ExtractionFailureKind::Transient
    };
    Error::ExtractionFailed {
        kind,
        message: e.to_string(),
    }
}

#[async_trait]
impl ExtractorBackend for OllamaExtractor {
    async fn extract(&self, image_bytes: &[u8], _mime_type: &str) -> Result<String> {
        // The generate API infers the image format; the declared MIME
        // type is part of the adapter contract but unused here.
        let base64_image = base64::engine::general_purpose::STANDARD.encode(image_bytes);

        let request = OllamaVisionRequest {
            model: self.model.clone(),
            prompt: EXTRACTION_PROMPT.to_string(),
            images: vec![base64_image],
            stream: false,
        };

        let response = self
            .http_client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(request_error)?;

        if !response.status().is_success() {
            return Err(Error::ExtractionFailed {
                kind: ExtractionFailureKind::Transient,
                message: format!("extraction service returned {}", response.status()),
            });
        }

        let ollama_response: OllamaResponse = response.json().await.map_err(request_error)?;
        debug!(model = %self.model, "Extraction response: {}", ollama_response.response);

        if ollama_response.response.trim().is_empty() {
            return Err(Error::ExtractionFailed {
                kind: ExtractionFailureKind::Transient,
                message: "extraction service returned an empty response".to_string(),
            });
        }

        Ok(ollama_response.response)
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_keeps_configuration() {
        let extractor =
            OllamaExtractor::new("http://localhost:11434/", "llava", Duration::from_secs(5))
                .unwrap();
        assert_eq!(extractor.host(), "http://localhost:11434");
        assert_eq!(extractor.model(), "llava");
    }
}

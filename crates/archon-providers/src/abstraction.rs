//! ABOUTME: The `Provider` trait seam: every AI backend implements this, real or mocked
//! ABOUTME: `RawResponse` is what flows into `archon-validate`, untouched

use crate::catalog::ModelId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderCallError {
    #[error("request timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },
    #[error("http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("network error: {0}")]
    Network(String),
}

impl ProviderCallError {
    /// Whether a retry could plausibly succeed: timeouts, 5xx, and 429 are
    /// retryable; 4xx other than 429 is not (spec §4.5).
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Network(_) => true,
            Self::Http { status, .. } => *status == 429 || *status >= 500,
        }
    }
}

/// The provider's raw text output plus minimal call metadata. Parsing and
/// validation happen downstream in `archon-validate`; this stage never
/// inspects the body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawResponse {
    pub text: String,
    pub model_id: String,
    pub latency_ms: u64,
    pub tokens_in: Option<u64>,
    pub tokens_out: Option<u64>,
    pub finish_reason: Option<String>,
}

/// Connection details for one provider backend. Secrets are referenced by
/// env var name, never embedded (spec §6's config layering resolves them).
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub auth_header_env: String,
    pub timeout_ms: u64,
}

/// One AI backend. `archon-providers` ships HTTP implementations for
/// Vertex AI and GitHub Models; tests use a scripted double.
#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &str;

    async fn call(&self, model: ModelId, prompt: &str, config: &ProviderConfig) -> Result<RawResponse, ProviderCallError>;
}

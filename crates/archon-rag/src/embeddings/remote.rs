//! ABOUTME: HTTP-backed embedder calling a remote embeddings endpoint

use super::Embedder;
use archon_core::error::{OrchestratorError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RemoteEmbedderConfig {
    pub endpoint: String,
    pub api_key: String,
    pub model_id: String,
    pub dimension: usize,
    pub timeout: Duration,
}

impl RemoteEmbedderConfig {
    /// Load configuration from environment variables, following the
    /// `ARCHON_EMBEDDINGS_*` naming convention used throughout the service.
    pub fn from_env() -> Result<Self> {
        let endpoint = std::env::var("ARCHON_EMBEDDINGS_ENDPOINT")
            .map_err(|_| OrchestratorError::Configuration {
                message: "ARCHON_EMBEDDINGS_ENDPOINT is not set".to_string(),
            })?;
        let api_key = std::env::var("ARCHON_EMBEDDINGS_API_KEY").map_err(|_| OrchestratorError::Configuration {
            message: "ARCHON_EMBEDDINGS_API_KEY is not set".to_string(),
        })?;
        let model_id =
            std::env::var("ARCHON_EMBEDDINGS_MODEL").unwrap_or_else(|_| "text-embedding-3-small".to_string());
        Ok(Self {
            endpoint,
            api_key,
            model_id,
            dimension: 1536,
            timeout: Duration::from_secs(30),
        })
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
}

pub struct RemoteEmbedder {
    client: reqwest::Client,
    config: RemoteEmbedderConfig,
}

impl RemoteEmbedder {
    pub fn new(config: RemoteEmbedderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| OrchestratorError::Configuration {
                message: format!("failed to build embeddings http client: {e}"),
            })?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl Embedder for RemoteEmbedder {
    fn model_id(&self) -> &str {
        &self.config.model_id
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&EmbeddingRequest {
                model: &self.config.model_id,
                input: texts,
            })
            .send()
            .await
            .map_err(|e| OrchestratorError::Provider {
                message: format!("embeddings request failed: {e}"),
                retryable: true,
            })?;

        if !response.status().is_success() {
            let retryable = response.status().is_server_error() || response.status().as_u16() == 429;
            return Err(OrchestratorError::Provider {
                message: format!("embeddings endpoint returned {}", response.status()),
                retryable,
            });
        }

        let parsed: EmbeddingResponse = response.json().await.map_err(|e| OrchestratorError::Provider {
            message: format!("failed to parse embeddings response: {e}"),
            retryable: false,
        })?;

        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }
}

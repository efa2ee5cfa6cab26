//! ABOUTME: HTTP `Provider` implementations for Vertex AI and GitHub Models
//! ABOUTME: Request/response shapes ported from the original `_call_vertex_ai`/`_call_github_models`

use crate::abstraction::{Provider, ProviderCallError, ProviderConfig, RawResponse};
use crate::catalog::ModelId;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Instant;

fn auth_token(env_var: &str) -> Result<String, ProviderCallError> {
    std::env::var(env_var).map_err(|_| ProviderCallError::Network(format!("missing credential in env var {env_var}")))
}

/// `POST /v1/projects/{project}/locations/{location}/publishers/google/models/{model}:generateContent`
pub struct VertexAiProvider {
    client: reqwest::Client,
    project_id: String,
    location: String,
}

impl VertexAiProvider {
    #[must_use]
    pub fn new(project_id: String, location: String) -> Self {
        Self { client: reqwest::Client::new(), project_id, location }
    }
}

#[async_trait]
impl Provider for VertexAiProvider {
    fn name(&self) -> &str {
        "vertex_ai"
    }

    async fn call(&self, model: ModelId, prompt: &str, config: &ProviderConfig) -> Result<RawResponse, ProviderCallError> {
        let token = auth_token(&config.auth_header_env)?;
        let url = format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
            config.base_url, self.project_id, self.location, model.model
        );
        let payload = json!({
            "contents": [{"parts": [{"text": prompt}]}],
            "generationConfig": {
                "temperature": 0.1,
                "maxOutputTokens": 4000,
                "responseMimeType": "application/json",
            },
        });

        let started = Instant::now();
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .timeout(std::time::Duration::from_millis(config.timeout_ms))
            .json(&payload)
            .send()
            .await
            .map_err(|err| if err.is_timeout() { ProviderCallError::Timeout { elapsed_ms: started.elapsed().as_millis() as u64 } } else { ProviderCallError::Network(err.to_string()) })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderCallError::Http { status: status.as_u16(), body });
        }

        let body: serde_json::Value = response.json().await.map_err(|err| ProviderCallError::Network(err.to_string()))?;
        let text = body
            .get("candidates")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("content"))
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.get(0))
            .and_then(|p| p.get("text"))
            .and_then(|t| t.as_str())
            .ok_or_else(|| ProviderCallError::Network("empty response from Vertex AI".to_string()))?;

        let usage = body.get("usageMetadata");
        let tokens_in = usage.and_then(|u| u.get("promptTokenCount")).and_then(Value::as_u64);
        let tokens_out = usage.and_then(|u| u.get("candidatesTokenCount")).and_then(Value::as_u64);
        let finish_reason = body
            .get("candidates")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("finishReason"))
            .and_then(|r| r.as_str())
            .map(str::to_string);

        Ok(RawResponse {
            text: text.to_string(),
            model_id: model.key(),
            latency_ms: started.elapsed().as_millis() as u64,
            tokens_in,
            tokens_out,
            finish_reason,
        })
    }
}

/// `POST /chat/completions` (OpenAI-compatible shape, per GitHub Models).
pub struct GitHubModelsProvider {
    client: reqwest::Client,
}

impl Default for GitHubModelsProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl GitHubModelsProvider {
    #[must_use]
    pub fn new() -> Self {
        Self { client: reqwest::Client::new() }
    }
}

#[async_trait]
impl Provider for GitHubModelsProvider {
    fn name(&self) -> &str {
        "github_models"
    }

    async fn call(&self, model: ModelId, prompt: &str, config: &ProviderConfig) -> Result<RawResponse, ProviderCallError> {
        let token = auth_token(&config.auth_header_env)?;
        let payload = json!({
            "model": model.model,
            "messages": [
                {"role": "system", "content": "You are an expert architect specializing in BIM and Revit. Always respond with valid JSON."},
                {"role": "user", "content": prompt},
            ],
        });

        let started = Instant::now();
        let response = self
            .client
            .post(format!("{}/chat/completions", config.base_url))
            .bearer_auth(token)
            .timeout(std::time::Duration::from_millis(config.timeout_ms))
            .json(&payload)
            .send()
            .await
            .map_err(|err| if err.is_timeout() { ProviderCallError::Timeout { elapsed_ms: started.elapsed().as_millis() as u64 } } else { ProviderCallError::Network(err.to_string()) })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderCallError::Http { status: status.as_u16(), body });
        }

        let body: serde_json::Value = response.json().await.map_err(|err| ProviderCallError::Network(err.to_string()))?;
        let text = body
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|t| t.as_str())
            .ok_or_else(|| ProviderCallError::Network("empty response from GitHub Models".to_string()))?;

        let usage = body.get("usage");
        let tokens_in = usage.and_then(|u| u.get("prompt_tokens")).and_then(Value::as_u64);
        let tokens_out = usage.and_then(|u| u.get("completion_tokens")).and_then(Value::as_u64);
        let finish_reason = body
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("finish_reason"))
            .and_then(|r| r.as_str())
            .map(str::to_string);

        Ok(RawResponse {
            text: text.to_string(),
            model_id: model.key(),
            latency_ms: started.elapsed().as_millis() as u64,
            tokens_in,
            tokens_out,
            finish_reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_names_match_the_catalog_provider_field() {
        assert_eq!(VertexAiProvider::new("p".into(), "l".into()).name(), "vertex_ai");
        assert_eq!(GitHubModelsProvider::new().name(), "github_models");
    }
}

// Text-completion backends
//
// The translator only needs one capability from an inference server: turn a prompt
// into a continuation. Each backend speaks its own HTTP dialect:
// - Ollama: /api/generate in raw mode, so the ChatML prompt is not re-templated
// - LlamaCpp: llama.cpp's llama-server /completion endpoint

pub mod ollama;
pub mod llama_cpp;

use async_trait::async_trait;
use std::time::Duration;

use crate::config::{ModelBackend, ModelConfig, SamplingConfig};
use crate::error::{PolysubError, Result};

/// Sampling parameters sent with every completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingParams {
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub stop: Vec<String>,
}

impl From<SamplingConfig> for SamplingParams {
    fn from(config: SamplingConfig) -> Self {
        Self {
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            top_p: config.top_p,
            stop: config.stop,
        }
    }
}

impl Default for SamplingParams {
    fn default() -> Self {
        SamplingConfig::default().into()
    }
}

/// A text-completion service. Returns only the generated continuation, never the prompt.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Generate a continuation of `prompt`
    async fn complete(&self, prompt: &str, params: &SamplingParams) -> Result<String>;

    /// Fail early if the server is unreachable or the model is not loaded
    async fn check_availability(&self) -> Result<()>;

    /// Human-readable backend/model label for logs
    fn describe(&self) -> String;
}

/// Factory for creating model clients
pub struct ModelFactory;

impl ModelFactory {
    pub fn create_model(config: ModelConfig) -> Result<Box<dyn CompletionModel>> {
        let client = build_client(config.timeout_secs)?;

        let model: Box<dyn CompletionModel> = match config.backend {
            ModelBackend::Ollama => Box::new(ollama::OllamaModel::new(client, config)),
            ModelBackend::LlamaCpp => Box::new(llama_cpp::LlamaCppModel::new(client, config)),
        };
        Ok(model)
    }
}

fn build_client(timeout_secs: u64) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?;
    Ok(client)
}

/// Turn a non-success HTTP response into a model error carrying the body text.
pub(crate) async fn error_for_status(response: reqwest::Response, server: &str) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let error_text = response.text().await.unwrap_or_default();
    Err(PolysubError::Model(format!("{} API error {}: {}", server, status, error_text.trim())))
}

pub(crate) fn endpoint_url(endpoint: &str, path: &str) -> String {
    format!("{}/{}", endpoint.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_joins_cleanly() {
        assert_eq!(endpoint_url("http://localhost:11434/", "/api/generate"), "http://localhost:11434/api/generate");
        assert_eq!(endpoint_url("http://localhost:8080", "completion"), "http://localhost:8080/completion");
    }

    #[test]
    fn test_sampling_params_from_config() {
        let params = SamplingParams::default();
        assert_eq!(params.max_tokens, 512);
        assert_eq!(params.temperature, 0.1);
        assert_eq!(params.top_p, 0.3);
        assert_eq!(params.stop, vec!["<|im_end|>".to_string(), "\n\n\n".to_string()]);
    }

    #[test]
    fn test_factory_builds_each_backend() {
        let ollama = ModelFactory::create_model(ModelConfig::default()).unwrap();
        assert!(ollama.describe().starts_with("ollama"));

        let config = ModelConfig {
            backend: ModelBackend::LlamaCpp,
            endpoint: "http://127.0.0.1:8080".to_string(),
            ..ModelConfig::default()
        };
        let llama = ModelFactory::create_model(config).unwrap();
        assert!(llama.describe().starts_with("llama.cpp"));
    }
}

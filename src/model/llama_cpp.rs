use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ModelConfig;
use crate::error::{PolysubError, Result};
use super::{CompletionModel, SamplingParams, endpoint_url, error_for_status};

#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest<'a> {
    pub prompt: &'a str,
    pub n_predict: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub stop: &'a [String],
    pub stream: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionResponse {
    pub content: String,
}

/// llama.cpp `llama-server` client. The server has one model loaded, so no model name is sent.
pub struct LlamaCppModel {
    client: Client,
    config: ModelConfig,
}

impl LlamaCppModel {
    pub fn new(client: Client, config: ModelConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl CompletionModel for LlamaCppModel {
    async fn complete(&self, prompt: &str, params: &SamplingParams) -> Result<String> {
        let url = endpoint_url(&self.config.endpoint, "completion");
        debug!("Sending completion request to: {}", url);

        let request = CompletionRequest {
            prompt,
            n_predict: params.max_tokens,
            temperature: params.temperature,
            top_p: params.top_p,
            stop: &params.stop,
            stream: false,
        };

        let response = self.client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| PolysubError::Model(format!("HTTP request failed: {}", e)))?;

        let response = error_for_status(response, "llama.cpp").await?;

        let completion: CompletionResponse = response.json().await
            .map_err(|e| PolysubError::Model(format!("Failed to parse response: {}", e)))?;

        debug!("Raw llama.cpp response: {}", completion.content);
        Ok(completion.content)
    }

    async fn check_availability(&self) -> Result<()> {
        let url = endpoint_url(&self.config.endpoint, "health");

        let response = self.client
            .get(&url)
            .send()
            .await
            .map_err(|e| PolysubError::Model(format!("Failed to connect to llama.cpp server: {}", e)))?;

        error_for_status(response, "llama.cpp").await?;
        info!("llama.cpp server at {} is ready", self.config.endpoint);
        Ok(())
    }

    fn describe(&self) -> String {
        format!("llama.cpp @ {}", self.config.endpoint)
    }
}

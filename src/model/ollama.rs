use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use crate::config::ModelConfig;
use crate::error::{PolysubError, Result};
use super::{CompletionModel, SamplingParams, endpoint_url, error_for_status};

#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    /// Send the prompt verbatim; it is already ChatML-formatted
    pub raw: bool,
    pub stream: bool,
    pub options: GenerateOptions<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateOptions<'a> {
    pub num_predict: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub stop: &'a [String],
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    pub response: String,
    #[serde(default)]
    pub done: bool,
}

/// Ollama `/api/generate` client
pub struct OllamaModel {
    client: Client,
    config: ModelConfig,
}

impl OllamaModel {
    pub fn new(client: Client, config: ModelConfig) -> Self {
        Self { client, config }
    }

    fn request<'a>(&'a self, prompt: &'a str, params: &'a SamplingParams) -> GenerateRequest<'a> {
        GenerateRequest {
            model: &self.config.model,
            prompt,
            raw: true,
            stream: false,
            options: GenerateOptions {
                num_predict: params.max_tokens,
                temperature: params.temperature,
                top_p: params.top_p,
                stop: &params.stop,
            },
        }
    }
}

#[async_trait]
impl CompletionModel for OllamaModel {
    async fn complete(&self, prompt: &str, params: &SamplingParams) -> Result<String> {
        let url = endpoint_url(&self.config.endpoint, "api/generate");
        debug!("Sending completion request to: {}", url);

        let response = self.client
            .post(&url)
            .json(&self.request(prompt, params))
            .send()
            .await
            .map_err(|e| PolysubError::Model(format!("HTTP request failed: {}", e)))?;

        let response = error_for_status(response, "Ollama").await?;

        let generated: GenerateResponse = response.json().await
            .map_err(|e| PolysubError::Model(format!("Failed to parse response: {}", e)))?;

        if !generated.done {
            debug!("Ollama reported an unfinished generation");
        }
        debug!("Raw Ollama response: {}", generated.response);

        Ok(generated.response)
    }

    async fn check_availability(&self) -> Result<()> {
        let url = endpoint_url(&self.config.endpoint, "api/show");

        let response = self.client
            .post(&url)
            .json(&json!({ "name": self.config.model }))
            .send()
            .await
            .map_err(|e| PolysubError::Model(format!("Failed to connect to Ollama: {}", e)))?;

        if response.status().is_success() {
            info!("Ollama model '{}' is available", self.config.model);
            Ok(())
        } else {
            Err(PolysubError::Model(format!(
                "Ollama model '{}' not found. Please pull the model first: ollama pull {}",
                self.config.model, self.config.model
            )))
        }
    }

    fn describe(&self) -> String {
        format!("ollama:{} @ {}", self.config.model, self.config.endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn model_for(endpoint: String) -> OllamaModel {
        let config = ModelConfig {
            endpoint,
            model: "qwen2.5:14b".to_string(),
            ..ModelConfig::default()
        };
        OllamaModel::new(Client::new(), config)
    }

    #[tokio::test]
    async fn test_complete_sends_raw_prompt_with_options() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/generate")
            .match_body(Matcher::PartialJson(json!({
                "model": "qwen2.5:14b",
                "prompt": "<|im_start|>user\nhi<|im_end|>\n<|im_start|>assistant\n",
                "raw": true,
                "stream": false,
                "options": {
                    "num_predict": 512,
                    "top_p": 0.3,
                    "stop": ["<|im_end|>", "\n\n\n"]
                }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"response":"  안녕  ","done":true}"#)
            .create_async()
            .await;

        let model = model_for(server.url());
        let text = model
            .complete("<|im_start|>user\nhi<|im_end|>\n<|im_start|>assistant\n", &SamplingParams::default())
            .await
            .unwrap();

        assert_eq!(text, "  안녕  ");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_is_model_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/generate")
            .with_status(500)
            .with_body("model crashed")
            .create_async()
            .await;

        let err = model_for(server.url())
            .complete("p", &SamplingParams::default())
            .await
            .unwrap_err();

        assert!(matches!(err, PolysubError::Model(ref msg) if msg.contains("500") && msg.contains("model crashed")));
    }

    #[tokio::test]
    async fn test_malformed_body_is_model_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/generate")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"unexpected": 1}"#)
            .create_async()
            .await;

        let err = model_for(server.url())
            .complete("p", &SamplingParams::default())
            .await
            .unwrap_err();

        assert!(matches!(err, PolysubError::Model(ref msg) if msg.contains("Failed to parse response")));
    }

    #[tokio::test]
    async fn test_missing_model_fails_availability() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/show")
            .with_status(404)
            .create_async()
            .await;

        let err = model_for(server.url()).check_availability().await.unwrap_err();
        assert!(err.to_string().contains("ollama pull qwen2.5:14b"));
    }
}

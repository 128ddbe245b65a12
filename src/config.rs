use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::error::{Result, PolysubError};

// Default values for each configuration section
fn default_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "qwen2.5:14b-instruct-q4_K_M".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_max_tokens() -> u32 {
    512
}

fn default_temperature() -> f32 {
    0.1
}

fn default_top_p() -> f32 {
    0.3
}

fn default_stop() -> Vec<String> {
    vec!["<|im_end|>".to_string(), "\n\n\n".to_string()]
}

fn default_context_enabled() -> bool {
    true
}

fn default_context_history() -> usize {
    10
}

fn default_field_prefix() -> String {
    "text_".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub sampling: SamplingConfig,
    #[serde(default)]
    pub context: ContextConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Inference server flavour
    #[serde(default)]
    pub backend: ModelBackend,
    /// Base URL of the inference server
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Model name (ollama only; llama.cpp serves whatever it loaded)
    #[serde(default = "default_model")]
    pub model: String,
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelBackend {
    /// Ollama `/api/generate` in raw mode
    #[default]
    Ollama,
    /// llama.cpp `llama-server` `/completion`
    LlamaCpp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Upper bound on generated tokens per segment
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Nucleus sampling mass
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    /// Generation halts at any of these
    #[serde(default = "default_stop")]
    pub stop: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Feed preceding lines to the model as dialogue context
    #[serde(default = "default_context_enabled")]
    pub enabled: bool,
    /// Number of preceding segments to include
    #[serde(default = "default_context_history")]
    pub history: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output field is `<field_prefix><target code>`, e.g. `text_ko`
    #[serde(default = "default_field_prefix")]
    pub field_prefix: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            backend: ModelBackend::default(),
            endpoint: default_endpoint(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            stop: default_stop(),
        }
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            enabled: default_context_enabled(),
            history: default_context_history(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            field_prefix: default_field_prefix(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PolysubError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

impl ModelBackend {
    pub fn parse(value: &str) -> Result<Self> {
        match value.to_lowercase().replace('-', "_").as_str() {
            "ollama" => Ok(Self::Ollama),
            "llama_cpp" | "llamacpp" => Ok(Self::LlamaCpp),
            _ => Err(PolysubError::Config(format!(
                "Invalid model backend '{}'. Valid backends: ollama, llama-cpp",
                value
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.sampling.max_tokens, 512);
        assert_eq!(config.sampling.stop, vec!["<|im_end|>", "\n\n\n"]);
        assert!(config.context.enabled);
        assert_eq!(config.context.history, 10);
        assert_eq!(config.output.field_prefix, "text_");
        assert_eq!(config.model.backend, ModelBackend::Ollama);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config = Config::from_toml(
            "[model]\nbackend = \"llama_cpp\"\nendpoint = \"http://127.0.0.1:8080\"\n\n[context]\nhistory = 3\n",
        )
        .unwrap();

        assert_eq!(config.model.backend, ModelBackend::LlamaCpp);
        assert_eq!(config.model.endpoint, "http://127.0.0.1:8080");
        assert_eq!(config.model.timeout_secs, 300);
        assert_eq!(config.context.history, 3);
        assert!(config.context.enabled);
        assert_eq!(config.sampling, SamplingConfig::default());
    }

    #[test]
    fn test_invalid_toml_is_toml_error() {
        let err = Config::from_toml("[context\nhistory = ").unwrap_err();
        assert!(matches!(err, PolysubError::Toml(_)));
        assert!(err.to_string().starts_with("TOML parsing error"));

        let err = Config::from_toml("[context]\nhistory = \"ten\"").unwrap_err();
        assert!(matches!(err, PolysubError::Toml(_)));
    }

    #[test]
    fn test_parse_backend() {
        assert_eq!(ModelBackend::parse("llama-cpp").unwrap(), ModelBackend::LlamaCpp);
        assert_eq!(ModelBackend::parse("Ollama").unwrap(), ModelBackend::Ollama);
        assert!(ModelBackend::parse("vllm").is_err());
    }
}

use clap::Parser;
use std::path::PathBuf;

use crate::config::{Config, ModelBackend};
use crate::error::Result;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Multilingual subtitle translator backed by a local LLM",
    long_about = None,
    after_help = "Examples:\n  \
        # Japanese to Korean\n  \
        polysub --input subtitle.json --output subtitle_ko.json --input-lang ja --target-lang ko\n\n  \
        # Korean to English (no context)\n  \
        polysub --input subtitle.json --output subtitle_en.json --input-lang ko --target-lang en --no-context\n\n\
        Supported languages: ko, en, ja, zh, zh-tw, es, fr, de, ru"
)]
pub struct Args {
    /// Input JSON subtitle file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output JSON file
    #[arg(short, long)]
    pub output: PathBuf,

    /// Source language code
    #[arg(short = 's', long)]
    pub input_lang: String,

    /// Target language code
    #[arg(short, long)]
    pub target_lang: String,

    /// Disable context-aware translation
    #[arg(long)]
    pub no_context: bool,

    /// Number of previous segments given as context
    #[arg(long)]
    pub history: Option<usize>,

    /// Model backend (ollama, llama-cpp)
    #[arg(long)]
    pub backend: Option<String>,

    /// Inference server URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Model name (ollama)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply_to(&self, config: &mut Config) -> Result<()> {
        if self.no_context {
            config.context.enabled = false;
        }
        if let Some(history) = self.history {
            config.context.history = history;
        }
        if let Some(backend) = &self.backend {
            config.model.backend = ModelBackend::parse(backend)?;
        }
        if let Some(endpoint) = &self.endpoint {
            config.model.endpoint = endpoint.clone();
        }
        if let Some(model) = &self.model {
            config.model.model = model.clone();
        }
        Ok(())
    }
}

use tracing::{debug, warn};

use crate::error::Result;
use crate::language::Language;
use crate::model::{CompletionModel, SamplingParams};
use crate::prompt::build_translation_prompt;

/// Prefix marking a segment whose model call failed.
pub const TRANSLATION_ERROR_PREFIX: &str = "[Translation Error";

/// Prefix marking a segment that failed before reaching the model.
pub const SEGMENT_ERROR_PREFIX: &str = "[Error";

const PREVIEW_CHARS: usize = 50;

/// Outcome of translating one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    Translated(String),
    Failed { reason: String },
}

impl Translation {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Value written into the segment's output field.
    pub fn render(&self) -> String {
        match self {
            Self::Translated(text) => text.clone(),
            Self::Failed { reason } => format!("{}: {}]", TRANSLATION_ERROR_PREFIX, reason),
        }
    }
}

/// Translates single segments through a completion model.
pub struct Translator {
    model: Box<dyn CompletionModel>,
    params: SamplingParams,
}

impl Translator {
    pub fn new(model: Box<dyn CompletionModel>, params: SamplingParams) -> Self {
        Self { model, params }
    }

    pub fn model(&self) -> &dyn CompletionModel {
        self.model.as_ref()
    }

    /// Translate `text` from `source` to `target`, optionally with preceding dialogue lines.
    ///
    /// Unsupported language codes are rejected before the model is called. Model failures
    /// never surface as `Err`; they come back as [`Translation::Failed`].
    pub async fn translate<S: AsRef<str> + Sync>(
        &self,
        text: &str,
        source: &str,
        target: &str,
        context: Option<&[S]>,
    ) -> Result<Translation> {
        let source = Language::resolve("input", source)?;
        let target = Language::resolve("target", target)?;

        Ok(self.translate_resolved(text, source, target, context).await)
    }

    /// Same as [`Translator::translate`] for languages that are already validated.
    pub async fn translate_resolved<S: AsRef<str> + Sync>(
        &self,
        text: &str,
        source: Language,
        target: Language,
        context: Option<&[S]>,
    ) -> Translation {
        let prompt = build_translation_prompt(text, source, target, context);
        debug!("Prompt length: {} bytes", prompt.len());

        match self.model.complete(&prompt, &self.params).await {
            Ok(generated) => Translation::Translated(generated.trim().to_string()),
            Err(e) => {
                warn!("Translation failed for: {}...", preview(text));
                warn!("   Error: {}", e);
                Translation::Failed { reason: e.to_string() }
            }
        }
    }
}

/// First characters of `text`, cut on a char boundary.
pub fn preview(text: &str) -> &str {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::context::ContextWindow;
use crate::document::Document;
use crate::error::Result;
use crate::language::Language;
use crate::model::{CompletionModel, ModelFactory};
use crate::translate::{SEGMENT_ERROR_PREFIX, Translation, Translator};

/// Cooperative stop request, checked between segments.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    flag: Arc<AtomicBool>,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Trigger on Ctrl-C. A request already sent to the model still completes.
    pub fn listen_for_ctrl_c(&self) {
        let interrupt = self.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Translation interrupted by user, finishing current segment");
                interrupt.trigger();
            }
        });
    }
}

/// Counts reported after a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub translated: usize,
    pub failed: usize,
    pub interrupted: bool,
}

impl RunSummary {
    pub fn succeeded(&self) -> usize {
        self.translated - self.failed
    }

    /// Segments never attempted because the run stopped early.
    pub fn skipped(&self) -> usize {
        self.total - self.translated
    }
}

pub struct Workflow {
    config: Config,
    translator: Translator,
    window: ContextWindow,
    progress: ProgressBar,
}

impl Workflow {
    pub fn new(config: Config) -> Result<Self> {
        let model = ModelFactory::create_model(config.model.clone())?;
        Ok(Self::with_model(config, model))
    }

    /// Build a workflow around an existing model client.
    pub fn with_model(config: Config, model: Box<dyn CompletionModel>) -> Self {
        let translator = Translator::new(model, config.sampling.clone().into());
        let window = ContextWindow::from(config.context);

        Self {
            config,
            translator,
            window,
            progress: ProgressBar::hidden(),
        }
    }

    /// Show a per-segment progress bar on the terminal.
    pub fn with_progress(mut self) -> Self {
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} Progress [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} segments ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        self.progress = ProgressBar::new(0).with_style(style);
        self
    }

    pub fn window(&self) -> ContextWindow {
        self.window
    }

    /// Output field name for a target language, e.g. `text_ko`.
    pub fn field_name(&self, target: Language) -> String {
        format!("{}{}", self.config.output.field_prefix, target.code())
    }

    pub async fn check_model(&self) -> Result<()> {
        info!("Checking model: {}", self.translator.model().describe());
        self.translator.model().check_availability().await
    }

    /// Translate every segment of `document` in order, writing results in place.
    ///
    /// Per-segment failures are recorded in the output field and counted; only
    /// unsupported language codes abort, and they do so before any model call.
    pub async fn translate_document(
        &self,
        document: &mut Document,
        source: &str,
        target: &str,
        interrupt: &Interrupt,
    ) -> Result<RunSummary> {
        let source = Language::resolve("input", source)?;
        let target = Language::resolve("target", target)?;
        let field_name = self.field_name(target);

        let total = document.segments.len();
        let mut summary = RunSummary {
            total,
            ..RunSummary::default()
        };

        let context_mode = if self.window.is_enabled() { "with context" } else { "without context" };
        info!(
            "Translating {} segments from {} to {} ({}) into '{}'",
            total,
            source.display_name(),
            target.display_name(),
            context_mode,
            field_name
        );

        self.progress.set_length(total as u64);

        for idx in 0..total {
            if interrupt.is_triggered() {
                summary.interrupted = true;
                warn!("Stopping after {}/{} segments", idx, total);
                break;
            }

            debug!("┌─ Translating segment {}/{} ────────", idx + 1, total);

            let rendered = match self.translate_segment(document, idx, source, target).await {
                Ok(translation) => {
                    if translation.is_failure() {
                        summary.failed += 1;
                    }
                    translation.render()
                }
                Err(e) => {
                    warn!("│ Unexpected error on segment {}: {}", idx + 1, e);
                    summary.failed += 1;
                    format!("{}: {}]", SEGMENT_ERROR_PREFIX, e)
                }
            };

            debug!("│ Target: {}", rendered);
            debug!("└─────────────────────────────────────");

            document.segments[idx].set(&field_name, rendered);
            summary.translated += 1;
            self.progress.inc(1);
        }

        if summary.interrupted {
            self.progress.abandon();
        } else {
            self.progress.finish();
        }

        Ok(summary)
    }

    async fn translate_segment(
        &self,
        document: &Document,
        idx: usize,
        source: Language,
        target: Language,
    ) -> Result<Translation> {
        let segments = document.segments.as_slice();
        let text = segments[idx].source_text()?;

        // Context always comes from the original source field, never from translations.
        let context = match self.window.select(segments, idx) {
            Some(previous) => Some(
                previous
                    .iter()
                    .map(|segment| segment.source_text())
                    .collect::<Result<Vec<_>>>()?,
            ),
            None => None,
        };

        debug!("│ Source: {}", text);
        if let Some(lines) = &context {
            debug!("│ Context: {} previous lines", lines.len());
        }

        Ok(self
            .translator
            .translate_resolved(text, source, target, context.as_deref())
            .await)
    }

    /// Load `input`, translate it, and save the result to `output`.
    ///
    /// The output is written even when the run was interrupted. If loading fails nothing is written.
    pub async fn translate_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
        source: &str,
        target: &str,
        interrupt: &Interrupt,
    ) -> Result<RunSummary> {
        let input = input.as_ref();
        let output = output.as_ref();

        // Reject bad codes before touching the filesystem.
        Language::resolve("input", source)?;
        Language::resolve("target", target)?;

        let mut document = Document::load(input).await?;
        let summary = self.translate_document(&mut document, source, target, interrupt).await?;

        if summary.interrupted {
            info!("Saving progress ({} of {} segments translated)", summary.translated, summary.total);
        }
        document.save(output).await?;

        Ok(summary)
    }
}

//! polysub - context-aware subtitle translation
//!
//! Entry point: loads configuration, checks the inference server, translates
//! every segment of a JSON subtitle file and writes the result.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::{non_blocking, rolling};

use polysub::cli::Args;
use polysub::config::Config;
use polysub::document::Document;
use polysub::language::Language;
use polysub::workflow::{Interrupt, Workflow};

const RULE_WIDTH: usize = 60;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Setup logging to both console and file
    setup_logging(args.verbose)?;

    // Load configuration, then let flags override it
    let mut config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if std::path::Path::new("polysub.toml").exists() {
                info!("Found polysub.toml in current directory, loading...");
                Config::from_file("polysub.toml")?
            } else {
                Config::default()
            }
        }
    };
    args.apply_to(&mut config)?;

    // Unsupported codes are rejected before anything expensive happens
    let source = Language::resolve("input", &args.input_lang)?;
    let target = Language::resolve("target", &args.target_lang)?;

    println!("{}", "=".repeat(RULE_WIDTH));
    println!("polysub - subtitle translator");
    println!("{}", "=".repeat(RULE_WIDTH));

    let workflow = Workflow::new(config)?.with_progress();

    println!("\n[1/4] Checking model server...");
    workflow.check_model().await.context("Model is not available")?;

    println!("\n[2/4] Loading {}...", args.input.display());
    let mut document = Document::load(&args.input)
        .await
        .with_context(|| format!("Failed to load {}", args.input.display()))?;
    println!("Loaded {} segments", document.segments.len());

    let context_mode = if workflow.window().is_enabled() {
        format!("with context, {} lines", workflow.window().history())
    } else {
        "without context".to_string()
    };
    println!(
        "\n[3/4] Translating from {} to {} ({})...",
        source.display_name(),
        target.display_name(),
        context_mode
    );

    let interrupt = Interrupt::new();
    interrupt.listen_for_ctrl_c();

    let summary = workflow
        .translate_document(&mut document, source.code(), target.code(), &interrupt)
        .await
        .with_context(|| format!("Failed to translate {}", args.input.display()))?;

    if summary.interrupted {
        info!("Saving progress ({} of {} segments translated)", summary.translated, summary.total);
    }
    println!("\n[4/4] Saving results...");
    document
        .save(&args.output)
        .await
        .with_context(|| format!("Failed to save {}", args.output.display()))?;

    println!("\n{}", "=".repeat(RULE_WIDTH));
    if summary.interrupted {
        println!("Translation interrupted - partial results saved");
    } else {
        println!("Translation complete");
    }
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("Total segments: {}", summary.total);
    println!("Translated: {}", summary.translated);
    println!("Successful: {}", summary.succeeded());
    if summary.failed > 0 {
        println!("Failed: {}", summary.failed);
    }
    if summary.skipped() > 0 {
        println!("Not translated: {}", summary.skipped());
    }
    println!("Output: {}", args.output.display());
    println!("{}", "=".repeat(RULE_WIDTH));

    Ok(())
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = std::env::current_dir()?.join(".polysub").join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "polysub.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false); // No ANSI colors in file

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Logging initialized - console: {}, file: {}",
          log_level, log_dir.join("polysub.log").display());

    Ok(())
}

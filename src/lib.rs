//! polysub - context-aware subtitle translation
//!
//! Translates the segments of an ASR JSON subtitle file one at a time through a
//! locally hosted LLM (ollama or llama.cpp server), feeding the preceding lines
//! to the model as dialogue context.

pub mod cli;
pub mod config;
pub mod context;
pub mod document;
pub mod error;
pub mod language;
pub mod model;
pub mod prompt;
pub mod translate;
pub mod workflow;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PolysubError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unsupported {role} language: {code} (supported: {supported})")]
    UnsupportedLanguage {
        role: &'static str,
        code: String,
        supported: String,
    },

    #[error("Model error: {0}")]
    Model(String),

    #[error("Segment error: {0}")]
    Segment(String),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid subtitle format: {0}")]
    InvalidDocument(String),
}

pub type Result<T> = std::result::Result<T, PolysubError>;

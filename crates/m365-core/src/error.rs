//! Error types for M365 Desktop

use thiserror::Error;

/// Result type alias for M365 Desktop operations
pub type M365Result<T> = Result<T, M365Error>;

/// Main error type for M365 Desktop
#[derive(Error, Debug)]
pub enum M365Error {
    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Ad blocking error: {0}")]
    AdBlock(String),

    #[error("Presence error: {0}")]
    Presence(String),

    #[error("Update check error: {0}")]
    Update(String),

    #[error("WebView error: {0}")]
    WebView(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl M365Error {
    /// Create a new settings error
    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new presence error
    pub fn presence(msg: impl Into<String>) -> Self {
        Self::Presence(msg.into())
    }

    /// Create a new update error
    pub fn update(msg: impl Into<String>) -> Self {
        Self::Update(msg.into())
    }

    /// Create a new WebView error
    pub fn webview(msg: impl Into<String>) -> Self {
        Self::WebView(msg.into())
    }
}

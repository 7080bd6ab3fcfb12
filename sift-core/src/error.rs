//! Errors raised while reading inputs and configuration

use thiserror::Error;

/// Errors from the core model
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Unknown network: {0}")]
    UnknownNetwork(String),

    #[error("Invalid scraping response: {0}")]
    InvalidResponse(#[source] serde_json::Error),

    #[error("Invalid user profile: {0}")]
    InvalidProfile(#[source] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    ConfigValidation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

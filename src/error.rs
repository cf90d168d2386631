// ABOUTME: Error types for the notification client
// Defines error conditions raised while polling, configuring, and alerting

use thiserror::Error;

/// Errors produced by the notification pipeline.
#[derive(Debug, Error)]
pub enum AlertError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {endpoint}")]
    Status { status: u16, endpoint: String },

    #[error("Request to {0} timed out")]
    Timeout(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Alert playback failed: {0}")]
    Playback(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading [`crate::ReporterConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Parse(String),

    #[error("invalid reporting config: {0}")]
    Invalid(String),

    #[error("could not determine config directory")]
    NoConfigDir,
}

/// Failures while submitting a diagnostic entry.
///
/// These never leave [`crate::Reporter`]; they exist so sinks can be tested.
#[derive(Debug, Clone, Error)]
pub enum ReportError {
    /// Error related to network connectivity or the HTTP request itself.
    #[error("Network request failed: {message}")]
    Request {
        message: String,
        url: Option<String>,
        is_timeout: bool,
    },

    /// The sink rejected the credentials.
    #[error("Diagnostics sink rejected credentials (status {status})")]
    Authentication { status: u16 },

    /// The sink returned a non-success status code.
    #[error("Diagnostics sink error (status {status}): {body_snippet}")]
    Status { status: u16, body_snippet: String },

    #[error("Failed to build http client: {0}")]
    Client(String),

    /// Raised by test and in-memory sinks.
    #[error("Sink failure: {0}")]
    Sink(String),
}

impl ReportError {
    pub(crate) fn from_reqwest(err: &reqwest::Error) -> Self {
        ReportError::Request {
            message: err.to_string(),
            url: err.url().map(|u| u.to_string()),
            is_timeout: err.is_timeout(),
        }
    }
}

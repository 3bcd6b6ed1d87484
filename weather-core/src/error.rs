use reqwest::StatusCode;
use thiserror::Error;

/// Failure to fetch or parse current conditions. Callers treat every variant
/// the same way: log it and keep whatever was shown before.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("refusing to query the provider with an empty location")]
    EmptyQuery,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to parse provider response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The session task has stopped and no longer accepts events.
#[derive(Debug, Error)]
#[error("weather session is closed")]
pub struct SessionClosed;

//! Error handling and custom error types
//!
//! Provides unified error handling across the crate using thiserror.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Required credentials missing or empty at construction time. Carries
    /// the name of every missing field so a single error reports them all.
    #[error("missing required configuration: {}", .0.join(", "))]
    Config(Vec<String>),

    /// Caller-supplied parameter out of the allowed range. Raised before
    /// any network call is made.
    #[error("invalid parameter: {0}")]
    Validation(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status in a place where this crate must interpret the
    /// response itself (storage-backend helpers). Plain API operations
    /// return the raw response instead.
    #[error("unexpected API status {status}: {body}")]
    Api { status: StatusCode, body: String },

    /// Batch-token retrieval or extraction failed while deriving a
    /// batch-mode client.
    #[error("could not create batch client: {0}")]
    BatchToken(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

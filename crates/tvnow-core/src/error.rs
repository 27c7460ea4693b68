//! Error types for the TV NOW scraper
//!
//! Splits failures into transport errors (the request did not complete),
//! malformed responses (the body lacks the expected top-level shape) and
//! per-item extraction errors, which never leave the parser.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Error type for all TV NOW scraper operations
///
/// Implements Display for human-readable messages and Serialize
/// for Tauri command compatibility.
#[derive(Error, Debug)]
pub enum TvnowError {
    /// HTTP request failed (network error, timeout or non-success status)
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Rate limited by server (HTTP 429)
    #[error("Rate limited - too many requests")]
    RateLimited,

    /// Requested resource does not exist (HTTP 404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Response was received but lacks the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Invalid station or program identifier provided
    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    /// Page identifier could not be parsed
    #[error("Invalid page identifier: {0}")]
    InvalidPageId(String),

    /// Client configuration cannot be used
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl TvnowError {
    /// Whether the request itself could not be completed
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            TvnowError::HttpError(_) | TvnowError::RateLimited | TvnowError::NotFound(_)
        )
    }

    /// Whether the response arrived but could not be understood
    pub fn is_malformed(&self) -> bool {
        matches!(self, TvnowError::MalformedResponse(_))
    }
}

impl Serialize for TvnowError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Result type alias for TV NOW operations
pub type Result<T> = std::result::Result<T, TvnowError>;

/// Failure to turn a single movie item into a video record
///
/// Only ever logged; the surrounding season keeps its other items.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// A required field is missing or has the wrong type
    #[error("unexpected movie shape: {0}")]
    Shape(#[from] serde_json::Error),

    /// A link field does not hold an absolute URL
    #[error("invalid {field} URL: {value:?}")]
    InvalidUri { field: &'static str, value: String },
}

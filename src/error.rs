//! Error types.
//!
//! Two families of errors exist:
//! - [`NewsError`]: failures while talking to a content source or loading
//!   configuration. Source errors never reach the user; the aggregator logs
//!   them and carries on with whatever the other sources returned.
//! - [`RequestError`]: invalid user input, rejected before any fetch happens.

use thiserror::Error;

/// Failure while fetching, decoding or configuring.
#[derive(Debug, Error)]
pub enum NewsError {
    /// Transport-level failure (DNS, TLS, connection reset, ...).
    #[error("HTTP request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status code.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The response body was not the JSON shape we expected.
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    /// A spawned fetch task panicked or was cancelled.
    #[error("fetch task for {source_name} did not complete: {reason}")]
    Task { source_name: String, reason: String },
}

/// Invalid aggregation request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("Please enter at least {min} characters for search")]
    QueryTooShort { min: usize },

    #[error("unknown category `{0}`")]
    UnknownCategory(String),
}

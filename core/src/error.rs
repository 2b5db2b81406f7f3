//! Error types for the batch-vault client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers routinely distinguish
//! "the batch does not exist" from "the server returned an unexpected
//! status." Upload failures carry the server's human-readable message so the
//! caller can show it as-is. Every other non-2xx response lands in
//! `HttpError` with the raw status code and body for debugging.

use thiserror::Error;

/// Fallback message used when a failed upload response carries no `message`.
pub const UPLOAD_FAILED_MESSAGE: &str = "Upload failed";

/// Errors returned by `BatchClient`, `RequestClient` and `LinkComposer`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server reported that the requested batch does not exist.
    #[error("batch not found")]
    NotFound,

    /// The PDF upload was rejected. Holds the server's `message` field, or
    /// [`UPLOAD_FAILED_MESSAGE`] when none was sent.
    #[error("{0}")]
    UploadFailed(String),

    /// The server returned a non-2xx status not covered above.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The request never produced a response (connection refused, DNS, TLS).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// A configured or composed URL is not a valid absolute http(s) URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// The platform refused to open the composed link.
    #[error("failed to open link: {0}")]
    OpenLink(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::DeserializationError(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

//! Error types for the clinic API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers distinguish "the record
//! is gone" from "the server returned an unexpected status." All other non-2xx
//! responses land in `HttpError` with the raw status code and body. Only a
//! `Transport` failure, where no response arrived at all, is treated like a
//! 503 by the retry policy. A body that fails to decode is deterministic.

use thiserror::Error;

/// HTTP status the backend answers with while it is still starting up.
pub const SERVICE_UNAVAILABLE: u16 = 503;

/// Errors returned by the client, the transports and the REST API layer.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The request never produced a response (DNS, connect, reset...).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

impl ApiError {
    /// Status code carried by the failure, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound => Some(404),
            ApiError::HttpError { status, .. } => Some(*status),
            ApiError::Transport(_)
            | ApiError::DeserializationError(_)
            | ApiError::SerializationError(_) => None,
        }
    }

    /// Whether the failure looks like a backend that is still waking up.
    pub fn is_transient(&self) -> bool {
        matches!(self, ApiError::Transport(_)) || self.status() == Some(SERVICE_UNAVAILABLE)
    }
}

//! Error types for webhook operations.

use thiserror::Error;

use super::SendResult;

/// Error type for HTTP transport operations.
///
/// Describes what went wrong at the network layer. The webhook client
/// never retries; these are surfaced to the caller unchanged.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, connection refused,
    /// and failures while reading the response body.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request timed out.
    #[error("Request timed out")]
    Timeout,

    /// The request URL is invalid.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// The HMAC primitive rejected its key.
///
/// HMAC accepts keys of any length, so this is not expected in practice.
#[derive(Debug, Error)]
#[error("Failed to compute signature: {0}")]
pub struct SignError(String);

impl SignError {
    pub(crate) fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// An audit sink failed to persist a record.
#[derive(Debug, Error)]
#[error("Audit sink failed: {0}")]
pub struct AuditError(#[source] pub Box<dyn std::error::Error + Send + Sync>);

/// Error type returned by [`WebhookClient`](super::WebhookClient) sends.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The transport failed; nothing was decoded.
    #[error(transparent)]
    Transport(#[from] HttpError),

    /// Signature computation failed before any request was made.
    #[error(transparent)]
    Sign(#[from] SignError),

    /// The outgoing parameters could not be encoded as JSON.
    #[error("Failed to encode request parameters: {0}")]
    Encode(#[source] serde_json::Error),

    /// The response body was not a valid webhook response.
    ///
    /// `partial` holds the zero-valued decoded result together with the
    /// raw body and raw transport response for inspection.
    #[error("Failed to decode webhook response")]
    Decode {
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
        /// Best-effort result carrying the raw body and response
        partial: Box<SendResult>,
    },
}

impl WebhookError {
    /// Returns the partial result attached to this error, if any.
    ///
    /// Only decode failures carry one; transport and signing failures
    /// abort before a response exists.
    #[must_use]
    pub fn partial(&self) -> Option<&SendResult> {
        match self {
            Self::Decode { partial, .. } => Some(partial),
            Self::Transport(_) | Self::Sign(_) | Self::Encode(_) => None,
        }
    }

    /// Consumes the error and returns its partial result, if any.
    #[must_use]
    pub fn into_partial(self) -> Option<SendResult> {
        match self {
            Self::Decode { partial, .. } => Some(*partial),
            Self::Transport(_) | Self::Sign(_) | Self::Encode(_) => None,
        }
    }
}

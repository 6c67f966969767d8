//! Webhook response decoding.

use serde::{Deserialize, Serialize};

use super::HttpResponse;

/// Decoded reply from the bot webhook endpoint.
///
/// Every field defaults to empty/zero when absent from the body.
/// A zero `error_code` means the platform accepted the message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookResponse {
    /// Platform status code (`errcode`, or `code` on newer endpoints)
    #[serde(rename = "errcode", alias = "code")]
    pub error_code: i64,
    /// Platform status message (`errmsg`, or `msg` on newer endpoints)
    #[serde(rename = "errmsg", alias = "msg")]
    pub error_message: String,
    /// Media type for upload-style replies
    #[serde(rename = "type")]
    pub media_type: String,
    /// Media identifier for upload-style replies
    pub media_id: String,
    /// Creation timestamp for upload-style replies
    pub created_at: String,
}

impl WebhookResponse {
    /// Returns true if the platform reported success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.error_code == 0
    }
}

/// Parses a raw response body into a [`WebhookResponse`].
///
/// # Errors
///
/// Returns the JSON error if `body` is not a JSON object of the expected shape.
pub fn decode(body: &[u8]) -> Result<WebhookResponse, serde_json::Error> {
    serde_json::from_slice(body)
}

/// Everything a send produced: the decoded reply, the raw body and the
/// raw transport response (status, headers, timing).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendResult {
    /// Decoded reply (zero-valued when decoding failed)
    pub result: WebhookResponse,
    /// Raw response body
    pub body: Vec<u8>,
    /// Raw transport response
    pub http: HttpResponse,
}

impl SendResult {
    /// Assembles a result from its parts.
    #[must_use]
    pub fn new(result: WebhookResponse, http: HttpResponse) -> Self {
        Self {
            result,
            body: http.body.clone(),
            http,
        }
    }
}

//! The bot webhook client.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::time::{Clock, SystemClock};

use super::audit::{self, AuditRecord, AuditSink, TracingAuditSink};
use super::params::{Params, SIGN_KEY, TIMESTAMP_KEY};
use super::response::{SendResult, WebhookResponse, decode};
use super::sign::sign;
use super::{HttpClient, HttpError, HttpRequest, HttpResponse, WebhookError};

/// Base URL of the public Feishu open platform.
pub const DEFAULT_BASE_URL: &str = "https://open.feishu.cn";

/// Path prefix of custom bot webhooks; the bot key follows it.
pub const HOOK_PATH: &str = "/open-apis/bot/v2/hook/";

/// Client for one custom bot webhook.
///
/// Holds the bot key and posts JSON messages to
/// `{base_url}/open-apis/bot/v2/hook/{key}`. Every call is a single
/// request/response round trip; nothing is retried and no state is kept
/// between calls, so one client can be shared by concurrent tasks.
///
/// Dropping a pending send future cancels the request.
///
/// # Type Parameters
///
/// - `H`: The HTTP client implementation
/// - `C`: Clock for signed-send timestamps (defaults to [`SystemClock`])
/// - `A`: Audit sink (defaults to [`TracingAuditSink`], disabled until enabled)
///
/// # Example
///
/// ```no_run
/// use feishu_webhook::webhook::{ReqwestClient, WebhookClient, params};
///
/// # async fn example() -> Result<(), feishu_webhook::webhook::WebhookError> {
/// let client = WebhookClient::new(ReqwestClient::new(), "your-bot-key");
/// let sent = client.send(params::text("hello")).await?;
/// assert!(sent.result.is_success());
/// # Ok(())
/// # }
/// ```
pub struct WebhookClient<H, C = SystemClock, A = TracingAuditSink> {
    http: H,
    clock: C,
    key: String,
    base_url: String,
    audit: Arc<A>,
    audit_enabled: bool,
}

impl<H> WebhookClient<H, SystemClock, TracingAuditSink> {
    /// Creates a client for the bot identified by `key`.
    ///
    /// The key is not validated; a bad key surfaces as a platform error
    /// in the response. No network I/O happens here.
    #[must_use]
    pub fn new(http: H, key: impl Into<String>) -> Self {
        Self {
            http,
            clock: SystemClock,
            key: key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            audit: Arc::new(TracingAuditSink),
            audit_enabled: false,
        }
    }
}

impl<H, C, A> WebhookClient<H, C, A> {
    /// Sets the platform base URL (e.g. `https://open.larksuite.com`).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the clock used for signed-send timestamps.
    #[must_use]
    pub fn with_clock<C2>(self, clock: C2) -> WebhookClient<H, C2, A> {
        WebhookClient {
            http: self.http,
            clock,
            key: self.key,
            base_url: self.base_url,
            audit: self.audit,
            audit_enabled: self.audit_enabled,
        }
    }

    /// Sets the audit sink and enables auditing.
    #[must_use]
    pub fn with_audit<A2>(self, sink: A2) -> WebhookClient<H, C, A2> {
        WebhookClient {
            http: self.http,
            clock: self.clock,
            key: self.key,
            base_url: self.base_url,
            audit: Arc::new(sink),
            audit_enabled: true,
        }
    }

    /// Turns audit dispatch on or off.
    #[must_use]
    pub const fn with_audit_enabled(mut self, enabled: bool) -> Self {
        self.audit_enabled = enabled;
        self
    }

    /// Returns the bot key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns true if audit records are dispatched after each send.
    #[must_use]
    pub const fn is_audit_enabled(&self) -> bool {
        self.audit_enabled
    }

    /// Returns the full webhook URL, including the bot key.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}{HOOK_PATH}{}", self.base_url.trim_end_matches('/'), self.key)
    }

    /// Returns the webhook URL with the bot key masked, for logs.
    fn redacted_endpoint(&self) -> String {
        format!("{}{HOOK_PATH}***", self.base_url.trim_end_matches('/'))
    }

    fn endpoint_url(&self) -> Result<url::Url, HttpError> {
        url::Url::parse(&self.endpoint())
            .map_err(|e| HttpError::InvalidUrl(format!("{}: {e}", self.redacted_endpoint())))
    }
}

impl<H: HttpClient, C: Clock, A: AuditSink> WebhookClient<H, C, A> {
    /// Posts `params` verbatim as the message body.
    ///
    /// # Errors
    ///
    /// - [`WebhookError::Transport`] if the request could not be completed
    /// - [`WebhookError::Decode`] if the reply is not valid JSON; the
    ///   error still carries the raw body and response
    pub async fn send(&self, params: Params) -> Result<SendResult, WebhookError> {
        self.post(&params).await
    }

    /// Posts `params` plus `timestamp` and `sign` fields for bots with
    /// signature verification enabled.
    ///
    /// The timestamp is the current Unix time in seconds; existing
    /// `timestamp`/`sign` keys in `params` are overwritten.
    ///
    /// # Errors
    ///
    /// As [`send`](Self::send), plus [`WebhookError::Sign`] before any
    /// request is made if the signature cannot be computed.
    pub async fn send_signed(
        &self,
        secret: &str,
        mut params: Params,
    ) -> Result<SendResult, WebhookError> {
        let timestamp = self.clock.unix_timestamp();
        let signature = sign(secret, &timestamp.to_string())?;

        params.insert(TIMESTAMP_KEY.to_string(), Value::from(timestamp));
        params.insert(SIGN_KEY.to_string(), Value::String(signature));

        self.post(&params).await
    }

    async fn post(&self, params: &Params) -> Result<SendResult, WebhookError> {
        let request = HttpRequest::post(self.endpoint_url()?)
            .with_json(params)
            .map_err(WebhookError::Encode)?;

        // Keep a copy only when a sink will need it
        let audit_request = self.audit_enabled.then(|| request.clone());

        tracing::debug!(url = %self.redacted_endpoint(), "Sending webhook request");

        let response = self
            .http
            .request(request)
            .await
            .inspect_err(|e| tracing::warn!("Webhook request failed: {e}"))?;

        tracing::debug!(
            status = response.status.as_u16(),
            elapsed_ms = u64::try_from(response.elapsed.as_millis()).unwrap_or(u64::MAX),
            "Webhook response received"
        );

        if let Some(request) = audit_request {
            let record = AuditRecord::new(&request, &response, self.redacted_endpoint());
            audit::dispatch(&self.audit, record);
        }

        Self::into_result(response)
    }

    fn into_result(reply: HttpResponse) -> Result<SendResult, WebhookError> {
        match decode(&reply.body) {
            Ok(result) => Ok(SendResult::new(result, reply)),
            Err(source) => {
                tracing::warn!(
                    status = reply.status.as_u16(),
                    "Failed to decode webhook response: {source}"
                );
                Err(WebhookError::Decode {
                    source,
                    partial: Box::new(SendResult::new(WebhookResponse::default(), reply)),
                })
            }
        }
    }
}

impl<H, C, A> fmt::Debug for WebhookClient<H, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookClient")
            .field("key", &"***")
            .field("base_url", &self.base_url)
            .field("audit_enabled", &self.audit_enabled)
            .finish_non_exhaustive()
    }
}

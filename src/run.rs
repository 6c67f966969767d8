//! Application execution logic.
//!
//! Builds the webhook client from validated configuration and performs
//! one send.

use thiserror::Error;

use feishu_webhook::config::ValidatedConfig;
use feishu_webhook::time::Clock;
use feishu_webhook::webhook::{
    AuditSink, HttpClient, HttpError, Params, ReqwestClient, SendResult, WebhookClient,
    WebhookError,
};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Failed to build the HTTP client.
    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] HttpError),

    /// The send failed in transport, signing or decoding.
    #[error("Webhook send failed: {0}")]
    Send(#[source] WebhookError),

    /// The platform answered with a non-zero status code.
    #[error("Platform rejected the message (code {code}): {message}")]
    Rejected {
        /// Platform status code
        code: i64,
        /// Platform status message
        message: String,
    },
}

impl RunError {
    /// Returns the partial result of a send whose reply could not be decoded.
    #[must_use]
    pub fn partial(&self) -> Option<&SendResult> {
        match self {
            Self::Send(err) => err.partial(),
            Self::Client(_) | Self::Rejected { .. } => None,
        }
    }
}

/// Sends `params` using the configured bot.
///
/// Signs the message when a secret is configured.
///
/// # Errors
///
/// Returns an error if the client cannot be built, the send fails, or
/// the platform rejects the message.
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig, params: Params) -> Result<SendResult, RunError> {
    let http = ReqwestClient::with_timeout(config.timeout).map_err(RunError::Client)?;
    let client = WebhookClient::new(http, config.key)
        .with_base_url(config.base_url.as_str())
        .with_audit_enabled(config.audit);

    deliver(&client, config.secret.as_deref(), params).await
}

/// Performs one send and maps a platform-side failure to [`RunError::Rejected`].
async fn deliver<H, C, A>(
    client: &WebhookClient<H, C, A>,
    secret: Option<&str>,
    params: Params,
) -> Result<SendResult, RunError>
where
    H: HttpClient,
    C: Clock,
    A: AuditSink,
{
    let sent = match secret {
        Some(secret) => client.send_signed(secret, params).await,
        None => client.send(params).await,
    }
    .map_err(RunError::Send)?;

    // Let a pending audit task run before the caller shuts the runtime down
    if client.is_audit_enabled() {
        tokio::task::yield_now().await;
    }

    if !sent.result.is_success() {
        return Err(RunError::Rejected {
            code: sent.result.error_code,
            message: sent.result.error_message,
        });
    }

    tracing::info!(
        elapsed_ms = u64::try_from(sent.http.elapsed.as_millis()).unwrap_or(u64::MAX),
        "Message delivered"
    );

    Ok(sent)
}

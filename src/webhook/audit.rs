//! Audit logging of completed webhook exchanges.
//!
//! After a successful transport round trip the client may hand an
//! [`AuditRecord`] to an [`AuditSink`] on a detached task. The send
//! never waits for the sink and never sees its errors.

use std::sync::Arc;
use std::time::Duration;

use super::{AuditError, HttpRequest, HttpResponse};

/// Crate version stamped on every audit record.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// One request/response exchange, as handed to an [`AuditSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    /// Version of this client library
    pub version: &'static str,
    /// HTTP method of the request
    pub method: http::Method,
    /// Request URL with the bot key redacted
    pub url: String,
    /// Request body as sent
    pub request_body: Vec<u8>,
    /// Response status code
    pub status: http::StatusCode,
    /// Response headers
    pub response_headers: http::HeaderMap,
    /// Raw response body
    pub response_body: Vec<u8>,
    /// Round-trip time
    pub elapsed: Duration,
}

impl AuditRecord {
    /// Builds a record from a request/response pair.
    ///
    /// `redacted_url` replaces the request URL so the bot key never
    /// reaches the sink.
    #[must_use]
    pub fn new(request: &HttpRequest, response: &HttpResponse, redacted_url: String) -> Self {
        Self {
            version: VERSION,
            method: request.method.clone(),
            url: redacted_url,
            request_body: request.body.clone().unwrap_or_default(),
            status: response.status,
            response_headers: response.headers.clone(),
            response_body: response.body.clone(),
            elapsed: response.elapsed,
        }
    }
}

/// Destination for audit records.
///
/// Implementations run on a detached task; they must not assume the
/// originating send is still in progress.
pub trait AuditSink: Send + Sync + 'static {
    /// Persists one record.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError`] if the record could not be stored. The
    /// error is logged and dropped by the caller.
    fn record(
        &self,
        record: AuditRecord,
    ) -> impl std::future::Future<Output = Result<(), AuditError>> + Send;
}

/// Audit sink that emits each record as a structured `tracing` event
/// on the `feishu_webhook::audit` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    async fn record(&self, record: AuditRecord) -> Result<(), AuditError> {
        tracing::info!(
            target: "feishu_webhook::audit",
            version = record.version,
            method = %record.method,
            url = %record.url,
            status = record.status.as_u16(),
            elapsed_ms = u64::try_from(record.elapsed.as_millis()).unwrap_or(u64::MAX),
            request_body = %String::from_utf8_lossy(&record.request_body),
            response_body = %String::from_utf8_lossy(&record.response_body),
            "webhook exchange"
        );
        Ok(())
    }
}

/// Dispatches `record` to `sink` on a detached Tokio task.
///
/// Returns without waiting. Outside a Tokio runtime the record is
/// dropped with a warning.
pub(crate) fn dispatch<A: AuditSink>(sink: &Arc<A>, record: AuditRecord) {
    let Ok(handle) = tokio::runtime::Handle::try_current() else {
        tracing::warn!("No Tokio runtime available, audit record dropped");
        return;
    };

    let sink = Arc::clone(sink);
    handle.spawn(async move {
        if let Err(e) = sink.record(record).await {
            tracing::warn!("Audit record not stored: {e}");
        }
    });
}

//! Custom bot webhook client.
//!
//! This module provides:
//! - HTTP transport abstraction ([`HttpClient`], [`HttpRequest`], [`HttpResponse`])
//! - Production HTTP client implementation ([`ReqwestClient`])
//! - Request signing ([`sign`])
//! - Message parameters and builders ([`params`])
//! - Response decoding ([`WebhookResponse`], [`SendResult`])
//! - Fire-and-forget audit logging ([`AuditSink`], [`TracingAuditSink`])
//! - The client itself ([`WebhookClient`])

mod audit;
mod bot;
mod client;
mod error;
mod http;
pub mod params;
mod response;
mod sign;

#[cfg(test)]
mod bot_tests;

pub use audit::{AuditRecord, AuditSink, TracingAuditSink, VERSION};
pub use bot::{DEFAULT_BASE_URL, HOOK_PATH, WebhookClient};
pub use client::ReqwestClient;
pub use error::{AuditError, HttpError, SignError, WebhookError};
pub use http::{HttpClient, HttpRequest, HttpResponse};
pub use params::Params;
pub use response::{SendResult, WebhookResponse, decode};
pub use sign::sign;

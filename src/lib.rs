//! Feishu Webhook: a client for custom bot webhooks
//!
//! Posts JSON messages to a bot's webhook URL, optionally signed with
//! the bot's shared secret, and decodes the platform's reply.

pub mod config;
pub mod time;
pub mod webhook;

//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::webhook::{Params, params};

use super::ConfigError;

/// Feishu Webhook: send messages to a custom bot
///
/// Posts a message to a bot webhook, signing it when a secret is
/// configured, and prints the platform's reply.
#[derive(Debug, Parser)]
#[command(name = "feishu-webhook")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Bot key (the last path segment of the webhook URL)
    #[arg(long, global = true)]
    pub key: Option<String>,

    /// Signing secret for bots with signature verification enabled
    #[arg(long, global = true)]
    pub secret: Option<String>,

    /// Platform base URL
    #[arg(long = "base-url", global = true)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Emit an audit record for every exchange
    #[arg(long, global = true)]
    pub audit: bool,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for feishu-webhook
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Send a message to the bot
    Send(MessageArgs),

    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "feishu-webhook.toml")]
        output: PathBuf,
    },
}

/// Message body for the `send` subcommand; exactly one form is required.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct MessageArgs {
    /// Plain text message
    #[arg(long)]
    pub text: Option<String>,

    /// Raw JSON object posted as the request body
    #[arg(long)]
    pub json: Option<String>,
}

impl MessageArgs {
    /// Converts the arguments into request parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidMessage`] if `--json` is not a JSON object.
    pub fn to_params(&self) -> Result<Params, ConfigError> {
        if let Some(text) = &self.text {
            return Ok(params::text(text));
        }

        let raw = self.json.as_deref().unwrap_or("{}");
        match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(serde_json::Value::Object(map)) => Ok(map),
            Ok(_) => Err(ConfigError::InvalidMessage {
                reason: "expected a JSON object".to_string(),
            }),
            Err(e) => Err(ConfigError::InvalidMessage {
                reason: e.to_string(),
            }),
        }
    }
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Command::Init { .. })
    }
}

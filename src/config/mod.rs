//! Configuration layer for the command-line front-end.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`], [`MessageArgs`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments**
//! 2. **TOML config file** - `--config`, or the default file under the
//!    user config directory when it exists
//! 3. **Built-in defaults**
//!
//! The bot key has no default and must come from the CLI or the file.
//! `--audit` uses OR semantics: set in either source, auditing is on.
//! An empty secret counts as no secret.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;


pub use cli::{Cli, Command, MessageArgs};
pub use error::{ConfigError, field};
pub use self::toml::{TomlConfig, default_config_template};
pub use validated::{ValidatedConfig, write_default_config};

//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use url::Url;

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config,
/// or [`ValidatedConfig::load`] to also locate and read the config file.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Bot key (required)
    pub key: String,

    /// Signing secret; `None` sends unsigned
    pub secret: Option<String>,

    /// Platform base URL
    pub base_url: Url,

    /// Request timeout
    pub timeout: Duration,

    /// Whether audit records are emitted
    pub audit: bool,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ base_url: {}, key: ***, signed: {}, timeout: {}s, audit: {} }}",
            self.base_url,
            self.secret.is_some(),
            self.timeout.as_secs(),
            self.audit,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The bot key is missing
    /// - The base URL is invalid
    /// - The timeout is zero
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let key = Self::resolve_key(cli, toml)?;
        let secret = Self::resolve_secret(cli, toml);
        let base_url = Self::resolve_base_url(cli, toml)?;
        let timeout = Self::resolve_timeout(cli, toml)?;

        // Flags only enable
        let audit = cli.audit || toml.is_some_and(|t| t.audit.enabled);

        Ok(Self {
            key,
            secret,
            base_url,
            timeout,
            audit,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and the config file.
    ///
    /// Uses `cli.config` if set; otherwise the default config file is
    /// read when it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let path = cli
            .config
            .clone()
            .or_else(|| defaults::config_path().filter(|p| p.is_file()));

        let toml = if let Some(ref path) = path {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_key(cli: &Cli, toml: Option<&TomlConfig>) -> Result<String, ConfigError> {
        cli.key
            .as_deref()
            .or_else(|| toml.and_then(|t| t.bot.key.as_deref()))
            .map(ToString::to_string)
            .ok_or_else(|| {
                ConfigError::missing(field::KEY, "Use --key or set bot.key in config file")
            })
    }

    fn resolve_secret(cli: &Cli, toml: Option<&TomlConfig>) -> Option<String> {
        cli.secret
            .as_deref()
            .or_else(|| toml.and_then(|t| t.bot.secret.as_deref()))
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
    }

    fn resolve_base_url(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Url, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let url_str = cli
            .base_url
            .as_deref()
            .or_else(|| toml.and_then(|t| t.bot.base_url.as_deref()))
            .unwrap_or(defaults::BASE_URL);

        let url = Url::parse(url_str).map_err(|e| ConfigError::InvalidUrl {
            url: url_str.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                url: url_str.to_string(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        if url.query().is_some() || url.fragment().is_some() {
            return Err(ConfigError::InvalidUrl {
                url: url_str.to_string(),
                reason: "must not contain a query or fragment".to_string(),
            });
        }

        Ok(url)
    }

    fn resolve_timeout(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Duration, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let seconds = cli
            .timeout
            .or_else(|| toml.and_then(|t| t.http.timeout))
            .unwrap_or(defaults::TIMEOUT_SECS);

        if seconds == 0 {
            return Err(ConfigError::InvalidDuration {
                field: "timeout",
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(Duration::from_secs(seconds))
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Bot credentials and endpoint
    #[serde(default)]
    pub bot: BotSection,

    /// HTTP transport settings
    #[serde(default)]
    pub http: HttpSection,

    /// Audit logging settings
    #[serde(default)]
    pub audit: AuditSection,
}

/// Bot configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BotSection {
    /// Bot key
    pub key: Option<String>,

    /// Signing secret
    pub secret: Option<String>,

    /// Platform base URL
    pub base_url: Option<String>,
}

/// HTTP configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpSection {
    /// Request timeout in seconds
    pub timeout: Option<u64>,
}

/// Audit configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditSection {
    /// Emit an audit record for every exchange
    #[serde(default)]
    pub enabled: bool,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# Feishu Webhook Configuration File

[bot]
# Bot key (required): the last path segment of the webhook URL
# https://open.feishu.cn/open-apis/bot/v2/hook/<key>
# key = "xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx"

# Signing secret, only for bots with signature verification enabled
# secret = "your-secret"

# Platform base URL (default: https://open.feishu.cn)
# Use https://open.larksuite.com for Lark
# base_url = "https://open.feishu.cn"

[http]
# Request timeout in seconds (default: 30)
# timeout = 30

[audit]
# Emit an audit record for every exchange (default: false)
# enabled = false
"#
    .to_string()
}

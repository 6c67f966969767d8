//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::path::PathBuf;

/// Default platform base URL.
pub const BASE_URL: &str = crate::webhook::DEFAULT_BASE_URL;

/// Default request timeout in seconds.
pub const TIMEOUT_SECS: u64 = 30;

/// Directory name under the user config directory.
pub const CONFIG_DIR_NAME: &str = "feishu-webhook";

/// File name of the default configuration file.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Location of the configuration file used when `--config` is absent.
///
/// Returns `None` on platforms without a user config directory.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

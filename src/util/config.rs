//! User configuration
//!
//! TOML config with serde-default merge semantics: a missing file or a
//! missing key falls back to the default value, CLI flags override
//! everything.
//!
//! ```text
//! Priority (high -> low):
//! 1. CLI arguments
//! 2. User-level (~/.config/sofash/config.toml)
//! 3. Default values
//! ```

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file exists but could not be read
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for this schema
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// User-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    /// Shell settings
    #[serde(default)]
    pub repl: ReplSection,
    /// Server settings
    #[serde(default)]
    pub server: ServerSection,
}

/// `[repl]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplSection {
    /// Primary prompt
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// Continuation prompt
    #[serde(default = "default_continuation_prompt")]
    pub continuation_prompt: String,
    /// Vi editing mode
    #[serde(default)]
    pub vi_mode: bool,
    /// History file path; defaults to the config directory
    #[serde(default)]
    pub history_file: Option<PathBuf>,
    /// Maximum session history entries
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

fn default_prompt() -> String {
    ">> ".to_string()
}

fn default_continuation_prompt() -> String {
    ".. ".to_string()
}

fn default_history_size() -> usize {
    1000
}

impl Default for ReplSection {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            continuation_prompt: default_continuation_prompt(),
            vi_mode: false,
            history_file: None,
            history_size: default_history_size(),
        }
    }
}

/// `[server]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    /// Base URL the verb builtins resolve relative paths against
    #[serde(default = "default_server_url")]
    pub url: String,
}

fn default_server_url() -> String {
    "http://127.0.0.1:5984".to_string()
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            url: default_server_url(),
        }
    }
}

/// Get the user config directory
pub fn get_config_dir() -> Option<PathBuf> {
    // Try XDG config directory on Unix
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg_config).join("sofash"));
    }

    // Fallback to ~/.config/sofash
    if let Ok(home) = std::env::var("HOME") {
        return Some(PathBuf::from(home).join(".config").join("sofash"));
    }

    // On Windows, try %APPDATA%
    if let Ok(appdata) = std::env::var("APPDATA") {
        return Some(PathBuf::from(appdata).join("sofash"));
    }

    None
}

/// Get the user config file path
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join("config.toml"))
}

/// Default history file path
pub fn default_history_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join("history"))
}

/// Load configuration from an explicit path
pub fn load_from(path: &std::path::Path) -> Result<UserConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load user-level configuration
///
/// Returns defaults if no config file exists.
pub fn load_user_config() -> Result<UserConfig, ConfigError> {
    let path = match get_config_path() {
        Some(p) => p,
        None => return Ok(UserConfig::default()),
    };

    if !path.exists() {
        return Ok(UserConfig::default());
    }

    load_from(&path)
}

//! Server configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (./shelfsync.toml, or SHELFSYNC_CONFIG)
//! 3. Environment variables (SHELFSYNC_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable prefix
const ENV_PREFIX: &str = "SHELFSYNC";

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface the server binds to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the server listens on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding the books and needs collections
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory holding per-page state documents
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,

    /// Repository that state commits land in
    #[serde(default = "default_repo_dir")]
    pub repo_dir: PathBuf,

    /// Whether state saves are recorded as git commits
    #[serde(default = "default_git_commits")]
    pub git_commits: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_dir: default_data_dir(),
            state_dir: default_state_dir(),
            repo_dir: default_repo_dir(),
            git_commits: default_git_commits(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from the default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (SHELFSYNC_HOST, SHELFSYNC_PORT, ...)
    /// 2. Config file (./shelfsync.toml or SHELFSYNC_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: ServerConfig =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(format!("{}_HOST", ENV_PREFIX)) {
            self.host = val;
        }

        if let Ok(val) = std::env::var(format!("{}_PORT", ENV_PREFIX)) {
            if let Ok(port) = val.parse() {
                self.port = port;
            }
        }

        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var(format!("{}_STATE_DIR", ENV_PREFIX)) {
            self.state_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var(format!("{}_REPO_DIR", ENV_PREFIX)) {
            self.repo_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var(format!("{}_GIT_COMMITS", ENV_PREFIX)) {
            self.git_commits = val.eq_ignore_ascii_case("true") || val == "1";
        }
    }

    /// Get the config file path
    ///
    /// Can be overridden with the SHELFSYNC_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }
        PathBuf::from("shelfsync.toml")
    }

    /// Get the path to the book collection file
    pub fn books_path(&self) -> PathBuf {
        self.data_dir.join("books.json")
    }

    /// Get the path to the collection needs file
    pub fn needs_path(&self) -> PathBuf {
        self.data_dir.join("needs.json")
    }

    /// The address the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_state_dir() -> PathBuf {
    PathBuf::from("state")
}

fn default_repo_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_git_commits() -> bool {
    true
}

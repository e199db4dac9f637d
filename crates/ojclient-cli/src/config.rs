//! Configuration management for the CLI
//!
//! This module handles loading and layering configuration from:
//! - Default values
//! - Configuration files (YAML/JSON)
//! - Environment variables and command-line arguments (via clap)

use crate::error::{Error, Result};
use ojclient_core::ClientConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Judge server connection
    pub server: ClientConfig,

    /// Session token storage
    pub auth: AuthConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// File this configuration was read from
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// Where the session token lives
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Token file; defaults to `<config dir>/ojclient/token.json`
    pub token_file: Option<PathBuf>,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Use colored output by default
    pub color: bool,

    /// Show spinners while requests are in flight
    pub progress: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level used when no verbosity flag is given
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: Option<String>,

    /// Log file path
    pub file: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            progress: true,
        }
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    )
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;

        let mut config: Config = if is_yaml(path) {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };
        config.source = Some(path.to_path_buf());

        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_first(&Self::default_config_paths())
    }

    /// Load the first existing file among `paths`, or the defaults
    ///
    /// A file that exists but fails to parse is an error rather than a
    /// silent fallback to defaults.
    fn load_first(paths: &[PathBuf]) -> Result<Self> {
        match paths.iter().find(|path| path.exists()) {
            Some(path) => Self::from_file(path).map_err(|e| {
                Error::config(format!("Failed to load {}: {}", path.display(), e))
            }),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        match file {
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }

    /// Default configuration file paths to check, in order
    pub fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".ojclient.yaml"),
            PathBuf::from(".ojclient.yml"),
            PathBuf::from(".ojclient.json"),
        ];

        if let Some(dir) = Self::user_config_dir() {
            paths.push(dir.join("config.yaml"));
            paths.push(dir.join("config.json"));
        }

        paths
    }

    /// `<config dir>/ojclient`
    pub fn user_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("ojclient"))
    }

    /// Default target of `config init`
    pub fn user_config_path() -> Option<PathBuf> {
        Self::user_config_dir().map(|d| d.join("config.yaml"))
    }

    /// Token file in effect
    pub fn token_file(&self) -> Result<PathBuf> {
        match &self.auth.token_file {
            Some(path) => Ok(path.clone()),
            None => Self::user_config_dir()
                .map(|d| d.join("token.json"))
                .ok_or_else(|| Error::config("Unable to determine the user config directory for the token file")),
        }
    }

    /// Apply command-line and environment overrides
    pub fn apply_overrides(&mut self, base_url: Option<String>, timeout_ms: Option<u64>) -> Result<()> {
        if let Some(base_url) = base_url {
            self.server.base_url = base_url;
        }
        if let Some(timeout_ms) = timeout_ms {
            self.server.timeout_ms = timeout_ms;
        }
        self.validate()
    }

    /// Check the server section
    pub fn validate(&self) -> Result<()> {
        self.server
            .validate()
            .map_err(|e| Error::config(e.to_string()))
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_yaml(path) {
            serde_yaml::to_string(self)?
        } else {
            serde_json::to_string_pretty(self)?
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

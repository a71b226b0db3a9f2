//! Host configuration, persisted as TOML.
//!
//! ```toml
//! [search]
//! default_review_count = 3
//!
//! [search.directory]
//! location = "Brooklyn, NY"
//! api_token = "..."
//! ```
//!
//! The token is read from the file but never written back.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use bizmatch_search::SearchConfig;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Top-level configuration file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Matching, directory and page settings.
    pub search: SearchConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/bizmatch/config.toml`.
    pub fn default_config_path() -> PathBuf {
        config_path_from(std::env::var_os("XDG_CONFIG_HOME"), std::env::var_os("HOME"))
    }

    /// Load `path` if given, otherwise the default file if it exists,
    /// otherwise defaults. The result is validated.
    ///
    /// # Errors
    ///
    /// An explicit `path` that cannot be read is an error; a missing default
    /// file is not. Validation failures surface as [`AppError::Search`].
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Self::default_config_path();
                if default_path.is_file() {
                    tracing::debug!(path = %default_path.display(), "loading config");
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.search.validate()?;
        Ok(config)
    }

    /// Fill in the directory API token.
    ///
    /// `explicit` (flag or `BIZMATCH_TOKEN`) always wins. `fallback` is only
    /// used when neither `explicit` nor the file supplied a token.
    pub fn apply_token(&mut self, explicit: Option<String>, fallback: Option<String>) {
        let token = &mut self.search.directory.api_token;
        if let Some(explicit) = explicit.filter(|t| !t.is_empty()) {
            *token = Some(explicit);
        } else if token.as_deref().is_none_or(str::is_empty) {
            *token = fallback.filter(|t| !t.is_empty());
        }
    }
}

fn config_path_from(xdg_config_home: Option<OsString>, home: Option<OsString>) -> PathBuf {
    if let Some(config) = xdg_config_home {
        PathBuf::from(config).join("bizmatch").join("config.toml")
    } else if let Some(home) = home {
        PathBuf::from(home)
            .join(".config")
            .join("bizmatch")
            .join("config.toml")
    } else {
        PathBuf::from("/tmp/bizmatch-config/config.toml")
    }
}

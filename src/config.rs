use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{MangoError, Result};

/// Pivotal Tracker API v5 root.
pub const DEFAULT_BASE_URL: &str = "https://www.pivotaltracker.com/services/v5";

pub const TOKEN_ENV: &str = "MANGO_TOKEN";
pub const PROJECT_ID_ENV: &str = "MANGO_PROJECT_ID";
pub const BASE_URL_ENV: &str = "MANGO_BASE_URL";

/// Connection settings for a [`crate::Mango`] client.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
}

impl ClientConfig {
    pub fn new(token: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            project_id: Some(project_id.into()),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Read `MANGO_TOKEN`, `MANGO_PROJECT_ID` and `MANGO_BASE_URL`.
    pub fn from_env() -> Self {
        Self {
            token: std::env::var(TOKEN_ENV).ok(),
            project_id: std::env::var(PROJECT_ID_ENV).ok(),
            base_url: std::env::var(BASE_URL_ENV).ok(),
        }
    }

    /// Layer `other` on top of `self`; set fields in `other` win.
    pub fn merge(self, other: ClientConfig) -> Self {
        Self {
            token: other.token.or(self.token),
            project_id: other.project_id.or(self.project_id),
            base_url: other.base_url.or(self.base_url),
        }
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .unwrap_or(DEFAULT_BASE_URL)
    }
}

/// Locates and reads `mango.toml`.
pub struct ConfigLoader;

impl ConfigLoader {
    const CONFIG_FILE: &'static str = "mango.toml";

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<ClientConfig> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            MangoError::Config(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Ok(toml::from_str(&content)?)
    }

    /// Search order:
    /// 1. current directory, then each parent
    /// 2. ~/.config/mango/mango.toml
    pub fn find_and_load() -> Option<ClientConfig> {
        let path = Self::find_in_ancestors().or_else(Self::user_config_path)?;
        match Self::load_from_path(&path) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "loaded config file");
                Some(config)
            }
            Err(e) => {
                tracing::warn!("{}", e);
                None
            }
        }
    }

    fn find_in_ancestors() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            let config_path = current.join(Self::CONFIG_FILE);
            if config_path.exists() {
                return Some(config_path);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    fn user_config_path() -> Option<PathBuf> {
        let path = dirs::home_dir()?
            .join(".config")
            .join("mango")
            .join(Self::CONFIG_FILE);
        path.exists().then_some(path)
    }

    /// File values, overridden by the environment, overridden by `overrides`.
    pub fn resolve(file: Option<PathBuf>, overrides: ClientConfig) -> Result<ClientConfig> {
        let from_file = match file {
            Some(path) => Self::load_from_path(path)?,
            None => Self::find_and_load().unwrap_or_default(),
        };

        Ok(from_file.merge(ClientConfig::from_env()).merge(overrides))
    }
}

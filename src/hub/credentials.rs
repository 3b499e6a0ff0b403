use crate::error::HubError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Kaggle API credentials (username + API key)
#[derive(Deserialize, Clone, PartialEq, Eq)]
pub struct KaggleCredentials {
    pub username: String,
    pub key: String,
}

impl std::fmt::Debug for KaggleCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KaggleCredentials")
            .field("username", &self.username)
            .field("key", &"***")
            .finish()
    }
}

impl KaggleCredentials {
    /// Load from `KAGGLE_USERNAME`/`KAGGLE_KEY`, falling back to `kaggle.json`
    pub fn load() -> Result<Self, HubError> {
        if let Some(creds) = Self::from_env() {
            tracing::debug!("Using Kaggle credentials from environment");
            return Ok(creds);
        }

        let path = config_dir()
            .ok_or(HubError::MissingCredentials)?
            .join("kaggle.json");

        if !path.exists() {
            return Err(HubError::MissingCredentials);
        }

        tracing::debug!("Using Kaggle credentials from {}", path.display());
        Self::from_file(&path)
    }

    fn from_env() -> Option<Self> {
        let username = std::env::var("KAGGLE_USERNAME").ok()?;
        let key = std::env::var("KAGGLE_KEY").ok()?;

        if username.is_empty() || key.is_empty() {
            return None;
        }

        Some(Self { username, key })
    }

    /// Parse a `kaggle.json` token file
    pub fn from_file(path: &Path) -> Result<Self, HubError> {
        let content = fs::read_to_string(path)?;

        let creds: Self =
            serde_json::from_str(&content).map_err(|e| HubError::BadCredentials {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        if creds.username.is_empty() || creds.key.is_empty() {
            return Err(HubError::BadCredentials {
                path: path.to_path_buf(),
                reason: "username and key must not be empty".to_string(),
            });
        }

        Ok(creds)
    }
}

/// Directory holding `kaggle.json`: `$KAGGLE_CONFIG_DIR` or `~/.kaggle`
fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("KAGGLE_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    dirs::home_dir().map(|home| home.join(".kaggle"))
}

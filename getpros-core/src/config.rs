//! Client configuration: defaults, then the JSON file in the platform config
//! directory, then `GETPROS_*` environment variables.

use crate::error::GetProsError;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const CONFIG_FILENAME: &str = "config.json";

pub const DEFAULT_BASE_URL: &str = "https://app.getpros.in";
pub const DEFAULT_PAGE_SIZE: usize = 8;
pub const DEFAULT_PREVIEW_SIZE: usize = 4;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub page_size: usize,
    pub preview_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            api_secret: None,
            page_size: DEFAULT_PAGE_SIZE,
            preview_size: DEFAULT_PREVIEW_SIZE,
        }
    }
}

impl ClientConfig {
    /// Defaults, overlaid with the config file (if any) and the environment
    pub fn load() -> Result<Self, GetProsError> {
        let path = Self::config_file_path()?;
        let config = Self::from_file_or_default(&path)?;
        config.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn config_file_path() -> Result<PathBuf, GetProsError> {
        ProjectDirs::from("", "", "getpros")
            .map(|proj_dirs| proj_dirs.config_dir().join(CONFIG_FILENAME))
            .ok_or_else(|| GetProsError::Config("Could not determine config directory".to_string()))
    }

    pub fn from_file_or_default(path: &Path) -> Result<Self, GetProsError> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config: ClientConfig = serde_json::from_str(&contents)?;
        info!(path = %path.display(), "Loaded client configuration");
        Ok(config)
    }

    /// Apply `GETPROS_BASE_URL`, `GETPROS_API_KEY`, `GETPROS_API_SECRET`,
    /// `GETPROS_PAGE_SIZE` and `GETPROS_PREVIEW_SIZE` as returned by `lookup`
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, GetProsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup("GETPROS_BASE_URL") {
            self.base_url = base_url;
        }
        if let Some(key) = lookup("GETPROS_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(secret) = lookup("GETPROS_API_SECRET") {
            self.api_secret = Some(secret);
        }
        if let Some(size) = lookup("GETPROS_PAGE_SIZE") {
            self.page_size = parse_size("GETPROS_PAGE_SIZE", &size)?;
        }
        if let Some(size) = lookup("GETPROS_PREVIEW_SIZE") {
            self.preview_size = parse_size("GETPROS_PREVIEW_SIZE", &size)?;
        }

        self.base_url = self.base_url.trim_end_matches('/').to_string();
        Ok(self)
    }

    /// `token key:secret` when both halves are configured
    pub fn auth_token(&self) -> Option<String> {
        match (&self.api_key, &self.api_secret) {
            (Some(key), Some(secret)) => Some(format!("token {}:{}", key, secret)),
            _ => None,
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), GetProsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

fn parse_size(key: &str, value: &str) -> Result<usize, GetProsError> {
    match value.trim().parse::<usize>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(GetProsError::Config(format!(
            "{} must be a positive integer, got '{}'",
            key, value
        ))),
    }
}

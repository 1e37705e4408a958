//! `AppConfig` struct and TOML read/write.

use std::path::Path;

use anyhow::{Context, Result};
use moviedeck_api::tmdb::DEFAULT_LANGUAGE;
use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB access settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
}

/// TMDB access configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct TmdbConfig {
    /// v3 API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Response language (e.g. `pt-BR`, `en-US`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// API base URL override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Returns the first value that is present and not blank.
fn first_non_blank<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(String::from)
}

impl TmdbConfig {
    /// Resolves the API key: command-line flag, then environment, then file.
    #[must_use]
    pub fn resolve_api_key(&self, flag: Option<&str>, env: Option<&str>) -> Option<String> {
        first_non_blank([flag, env, self.api_key.as_deref()])
    }

    /// Resolves the response language: command-line flag, then file, then
    /// the client default.
    #[must_use]
    pub fn resolve_language(&self, flag: Option<&str>) -> String {
        first_non_blank([flag, self.language.as_deref()])
            .unwrap_or_else(|| String::from(DEFAULT_LANGUAGE))
    }
}

impl AppConfig {
    /// Config written by `config init`.
    #[must_use]
    pub fn starter() -> Self {
        Self {
            tmdb: TmdbConfig {
                api_key: None,
                language: Some(String::from(DEFAULT_LANGUAGE)),
                base_url: None,
            },
        }
    }

    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }
}

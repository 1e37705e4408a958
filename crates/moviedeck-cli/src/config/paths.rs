//! Config directory, config file, and browse log locations.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Config file name inside the config directory.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Log file written next to the config file while the browser runs.
const LOG_FILE_NAME: &str = "moviedeck.log";

/// Resolves the config directory.
///
/// An explicit `dir` wins. Otherwise `$XDG_CONFIG_HOME/moviedeck` when that
/// variable is set and non-empty, else `~/.config/moviedeck`.
///
/// # Errors
///
/// Returns an error if neither `XDG_CONFIG_HOME` nor `HOME` is usable.
pub fn resolve_config_dir(dir: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.clone());
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(xdg).join("moviedeck"));
    }
    let home = std::env::var("HOME").context("HOME environment variable is not set")?;
    Ok(PathBuf::from(home).join(".config").join("moviedeck"))
}

/// Resolves the config file path inside [`resolve_config_dir`].
///
/// # Errors
///
/// Returns an error if the config directory cannot be determined.
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    Ok(resolve_config_dir(dir)?.join(CONFIG_FILE_NAME))
}

/// Opens the browse log for appending, creating `config_dir` when missing.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be created.
pub fn open_log_file(config_dir: &Path) -> Result<File> {
    std::fs::create_dir_all(config_dir)
        .with_context(|| format!("failed to create directory {}", config_dir.display()))?;
    let path = config_dir.join(LOG_FILE_NAME);
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}

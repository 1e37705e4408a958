//! Application configuration module.
//!
//! Manages the TOML config file holding TMDB credentials and the
//! response language.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::{AppConfig, TmdbConfig};
pub use paths::{open_log_file, resolve_config_dir, resolve_config_path};

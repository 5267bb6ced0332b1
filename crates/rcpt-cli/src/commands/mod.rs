//! Subcommand implementations.

pub mod batch;
pub mod config;
pub mod parse;

use std::path::PathBuf;

use tracing::debug;

use rcpt_core::RcptConfig;

/// Config file used when `--config` is not given.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rcpt")
        .join("config.json")
}

/// Path named by `--config`, or the default path.
pub fn config_path(config_path: Option<&str>) -> PathBuf {
    config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path)
}

/// Load the configuration file given with `--config`, else the default
/// config file if one exists, else the built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<RcptConfig> {
    if let Some(path) = config_path {
        return Ok(RcptConfig::from_file(std::path::Path::new(path))?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Using config file {}", path.display());
        Ok(RcptConfig::from_file(&path)?)
    } else {
        Ok(RcptConfig::default())
    }
}

//! Subcommands.

pub mod config;
pub mod inspect;
pub mod run;

use std::path::{Path, PathBuf};

use tracing::debug;

use fvwaga_core::FvWagaConfig;

/// Per-user configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fvwaga")
        .join("config.json")
}

/// Load the explicit config file, else the per-user one, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<FvWagaConfig> {
    if let Some(path) = config_path {
        debug!("Loading config from {}", path);
        return Ok(FvWagaConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Loading config from {}", default_path.display());
        return Ok(FvWagaConfig::from_file(&default_path)?);
    }

    Ok(FvWagaConfig::default())
}

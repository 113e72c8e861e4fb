//! Scanner configuration: schema plus file loading.
//!
//! Sources, lowest priority first: built-in defaults, the per-user config
//! file (`<config dir>/mcpscan/config.yaml`), an explicit `--config` file.
//! CLI flags are applied on top by the caller. The scanned repository is
//! never consulted for configuration.

pub mod schema;

use std::path::{Path, PathBuf};

use crate::error::{Result, ScanError};

pub use schema::{ExtractionConfig, OutputConfig, OutputFormat, ScannerConfig, WalkConfig};

/// File name of the per-user config inside the platform config directory.
const USER_CONFIG_FILE: &str = "config.yaml";

/// Location of the per-user config file, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "mcpscan")
        .map(|dirs| dirs.config_dir().join(USER_CONFIG_FILE))
}

/// Load configuration.
///
/// An explicit path must exist and parse. Without one, the per-user file is
/// used when present and defaults otherwise.
pub fn load_config(explicit: Option<&Path>) -> Result<ScannerConfig> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(ScanError::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        return load_config_file(path);
    }

    match user_config_path() {
        Some(path) if path.is_file() => {
            tracing::debug!(path = %path.display(), "loading user config");
            load_config_file(&path)
        }
        _ => Ok(ScannerConfig::default()),
    }
}

/// Parse a single YAML config file.
pub fn load_config_file(path: &Path) -> Result<ScannerConfig> {
    let contents = std::fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Ok(ScannerConfig::default());
    }
    serde_yaml::from_str(&contents).map_err(|e| {
        ScanError::Config(format!("failed to parse {}: {e}", path.display()))
    })
}

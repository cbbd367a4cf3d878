// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, StyledagError};

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Resolve the settings for a run.
///
/// - An explicit path must exist and be valid.
/// - Without one, `Styledag.toml` under `root` is used when present,
///   otherwise the built-in defaults.
pub fn load_or_default(explicit: Option<&Path>, root: &Path) -> Result<ConfigFile> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(StyledagError::ConfigError(format!(
                "config file {} does not exist",
                path.display()
            )));
        }
        info!(path = %path.display(), "loading config");
        return load_and_validate(path);
    }

    let candidate = root.join(default_config_path());
    if candidate.is_file() {
        info!(path = %candidate.display(), "loading config");
        load_and_validate(&candidate)
    } else {
        debug!(root = %root.display(), "no config file found; using built-in defaults");
        Ok(ConfigFile::default())
    }
}

/// File name looked up in the project root when `--config` is not given.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Styledag.toml")
}

// src/config/loader.rs

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;
use crate::fs::FileSystem;

/// Parse TOML into a `RawConfigFile` without semantic validation.
pub fn load_from_str(contents: &str) -> Result<RawConfigFile> {
    let config: RawConfigFile = toml::from_str(contents)?;
    Ok(config)
}

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; use [`load_and_validate`] to also
/// check bind address, CORS origins and limits.
pub fn load_from_path(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let contents = fs.read_to_string(path.as_ref())?;
    load_from_str(&contents)
}

/// Load a configuration file from path and run validation.
pub fn load_and_validate(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(fs, &path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Resolve the effective configuration.
///
/// - An explicit path must exist and be valid.
/// - Without one, `Pipedag.toml` in the working directory is used if present.
/// - Otherwise the built-in defaults apply.
pub fn resolve_config(fs: &dyn FileSystem, explicit: Option<&Path>) -> Result<ConfigFile> {
    if let Some(path) = explicit {
        info!(path = %path.display(), "loading config");
        return load_and_validate(fs, path);
    }

    let default_path = default_config_path();
    if fs.is_file(&default_path) {
        info!(path = %default_path.display(), "loading config");
        load_and_validate(fs, &default_path)
    } else {
        debug!("no config file found; using built-in defaults");
        Ok(ConfigFile::defaults())
    }
}

/// Default config location: `Pipedag.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Pipedag.toml")
}

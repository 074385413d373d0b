// src/errors.rs

//! Crate-wide error aliases and helpers.
//!
//! Graph validation itself never fails; these errors come from the layers
//! around it (config, payload files, the HTTP listener).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipedagError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to bind {addr}: {source}")]
    BindError {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, PipedagError>;

// src/config/mod.rs

//! Configuration loading and validation for pipedag.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file through the [`FileSystem`](crate::fs::FileSystem) seam (`loader.rs`).
//! - Validate the server section and build the typed config (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_from_str, resolve_config};
pub use model::{
    ConfigFile, CorsOrigins, RawConfigFile, RawServerSection, ServerSection, ValidationSection,
};

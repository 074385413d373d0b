// src/check.rs

//! Offline validation of a payload file (`--check`).

use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::api::{ParseResponse, build_response};
use crate::config::ConfigFile;
use crate::dag::GraphValidator;
use crate::errors::Result;
use crate::fs::FileSystem;

/// Read and parse a JSON payload file.
pub fn load_payload(fs: &dyn FileSystem, path: &Path) -> Result<Value> {
    let contents = fs.read_to_string(path)?;
    let payload: Value = serde_json::from_str(&contents)?;
    Ok(payload)
}

/// Validate the payload at `path` with the configured id policy.
pub fn check_file(fs: &dyn FileSystem, path: &Path, cfg: &ConfigFile) -> Result<ParseResponse> {
    let payload = load_payload(fs, path)?;
    let validator = GraphValidator::new(cfg.validation.id_policy);
    let response = build_response(&validator, cfg.validation.include_diagnostics, &payload);

    info!(
        path = %path.display(),
        num_nodes = response.result.num_nodes,
        num_edges = response.result.num_edges,
        is_dag = response.result.is_dag,
        "checked payload file"
    );

    Ok(response)
}

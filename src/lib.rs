// src/lib.rs

pub mod api;
pub mod check;
pub mod cli;
pub mod config;
pub mod dag;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod types;

use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::api::SubmissionStore;
use crate::cli::CliArgs;
use crate::config::ConfigFile;
use crate::config::loader::resolve_config;
use crate::config::validate::parse_bind;
use crate::fs::RealFileSystem;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config resolution (file or defaults, plus `--bind`)
/// - `--dry-run` / `--check` one-shot modes
/// - the submission store and HTTP server with Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let fs = RealFileSystem;
    let cfg = resolve_config(&fs, args.config.as_deref())?;

    let bind = match args.bind.as_deref() {
        Some(addr) => parse_bind(addr)?,
        None => cfg.server.bind,
    };

    if args.dry_run {
        print_dry_run(&cfg, bind);
        return Ok(());
    }

    if let Some(path) = args.check.as_deref() {
        let response = check::check_file(&fs, path, &cfg)?;
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    // Single process-wide snapshot, shared with the handlers.
    let store = Arc::new(SubmissionStore::new());
    api::serve(&cfg, bind, store).await?;
    Ok(())
}

/// Simple dry-run output: print the effective settings.
fn print_dry_run(cfg: &ConfigFile, bind: std::net::SocketAddr) {
    println!("pipedag dry-run");
    println!("  server.bind = {bind}");
    println!("  server.cors_allow_origins = {:?}", cfg.server.cors);
    println!("  server.max_body_bytes = {}", cfg.server.max_body_bytes);
    println!("  validation.id_policy = {}", cfg.validation.id_policy);
    println!(
        "  validation.include_diagnostics = {}",
        cfg.validation.include_diagnostics
    );

    debug!("dry-run complete (not serving)");
}

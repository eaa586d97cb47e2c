//! # jsv-cli — Command-Line Interface
//!
//! Thin front end over `jsv-schema` and `jsv-validator`. Argument structs
//! and `run_*` handlers live here so they can be tested without spawning
//! the binary; `main.rs` only parses, sets up logging and dispatches.
//!
//! ## Subcommands
//!
//! - `validate`: validate instance documents against a schema
//! - `check-schema`: load a schema, print loading diagnostics, and
//!   optionally rewrite it for another draft
//!
//! ## Exit Codes
//!
//! `0` success, `1` error (unreadable file, broken schema), `2` at least
//! one instance failed validation.

pub mod check;
pub mod config;
pub mod validate;

use std::path::Path;

use anyhow::Context;
use clap::ValueEnum;
use jsv_core::Draft;
use jsv_schema::{LoadedSchema, SchemaLoader};

use crate::config::CliConfig;

/// Exit code for a run in which some instance was invalid.
pub const EXIT_INVALID: u8 = 2;

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Load the schema file at `path`. A `--draft` given on the command line
/// overrides the configured fallback draft.
pub fn load_schema(
    path: &Path,
    draft: Option<Draft>,
    config: &CliConfig,
) -> anyhow::Result<LoadedSchema> {
    let mut loader_config = config.loader.clone();
    if let Some(draft) = draft {
        loader_config = loader_config.with_default_draft(draft);
    }
    let loaded = SchemaLoader::new(loader_config)
        .load_path(path)
        .with_context(|| format!("failed to load schema {}", path.display()))?;
    tracing::info!(
        schema = %path.display(),
        nodes = loaded.graph.len(),
        diagnostics = loaded.report.len(),
        "schema ready"
    );
    Ok(loaded)
}

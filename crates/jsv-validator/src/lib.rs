//! # jsv-validator — Instance Validation
//!
//! Checks JSON instances against a [`SchemaGraph`] loaded by `jsv-schema`
//! and reports every violation with its instance pointer, keyword, code
//! and schema location.
//!
//! ## Usage
//!
//! ```ignore
//! let loaded = SchemaLoader::default().load(&schema)?;
//! let validator = Validator::new(&loaded.graph);
//! let report = validator.validate(&instance);
//! if !report.is_valid() {
//!     eprint!("{report}");
//! }
//! ```
//!
//! ## Crate Policy
//!
//! - Validation never fails with `Err`; data mismatches are report entries.
//! - The engine never branches on draft; drafts are erased at load time.
//! - A [`Validator`] borrows its graph immutably and is `Send + Sync`.

pub mod config;
pub mod engine;
pub mod format;
pub mod instance;
mod keywords;
pub mod report;

pub use config::{FormatPolicy, UnknownFormatPolicy, ValidatorConfig};
pub use engine::Validator;
pub use format::{FormatRegistry, FormatValidator};
pub use instance::PathAwareValue;
pub use report::{
    ValidationError, ValidationReport, FALSE_SCHEMA_CODE, MULTIPLE_ERRORS_CODE,
    REFERENCE_CYCLE_CODE,
};

use jsv_schema::{SchemaError, SchemaGraph, SchemaLoader};
use serde_json::Value;

/// Load `schema` with default settings and validate `instance` against it.
pub fn validate(schema: &Value, instance: &Value) -> Result<ValidationReport, SchemaError> {
    let loaded = SchemaLoader::default().load(schema)?;
    Ok(validate_graph(&loaded.graph, instance))
}

/// Validate `instance` against an already loaded graph with default
/// settings.
pub fn validate_graph(graph: &SchemaGraph, instance: &Value) -> ValidationReport {
    Validator::new(graph).validate(instance)
}

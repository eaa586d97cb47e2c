//! # Validation Engine
//!
//! A [`Validator`] walks a [`SchemaGraph`] against an instance depth-first.
//! At each node it runs the node's keywords in order, skipping those that
//! constrain a different JSON type than the instance has, and dispatches
//! each to its checker in [`crate::keywords`]. Failures go to the
//! caller's [`ValidationReport`]; nothing is raised for data mismatches.
//!
//! ## Sharing
//!
//! The validator only borrows the graph and keeps no per-call state, so
//! one validator (or many over the same graph) can run on several threads
//! at once. Each call allocates its own report.
//!
//! ## Depth
//!
//! Recursion follows the instance. A `$ref` target may be entered once per
//! instance value; a reference loop that comes back to the same target
//! without descending into a member or element is reported as a single
//! `validation.reference.cycle` error instead of recursing. Instance depth
//! itself is not bounded here.

use jsv_core::JsonTypeSet;
use jsv_schema::{SchemaGraph, SchemaId};
use serde_json::Value;

use crate::config::ValidatorConfig;
use crate::format::FormatRegistry;
use crate::instance::PathAwareValue;
use crate::keywords;
use crate::report::ValidationReport;

/// Validates instances against one loaded schema graph.
#[derive(Debug)]
pub struct Validator<'g> {
    graph: &'g SchemaGraph,
    config: ValidatorConfig,
    formats: FormatRegistry,
}

impl<'g> Validator<'g> {
    /// A validator with default settings and the built-in formats.
    pub fn new(graph: &'g SchemaGraph) -> Self {
        Self {
            graph,
            config: ValidatorConfig::default(),
            formats: FormatRegistry::with_defaults(),
        }
    }

    pub fn with_config(mut self, config: ValidatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the format registry.
    pub fn with_formats(mut self, formats: FormatRegistry) -> Self {
        self.formats = formats;
        self
    }

    pub fn graph(&self) -> &'g SchemaGraph {
        self.graph
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn formats(&self) -> &FormatRegistry {
        &self.formats
    }

    /// Validate `instance` against the graph's root.
    pub fn validate(&self, instance: &Value) -> ValidationReport {
        let mut report = ValidationReport::new();
        let root = PathAwareValue::root(instance);
        self.validate_schema(self.graph.root(), &root, &mut report);
        tracing::debug!(
            schema = %self.graph.root_schema().location(),
            errors = report.len(),
            valid = report.is_valid(),
            "validation finished"
        );
        report
    }

    /// True when `instance` has no violations.
    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validate(instance).is_valid()
    }

    /// Validate `instance` against node `id`, adding failures to `report`.
    /// Returns true when this call added no error.
    pub fn validate_schema(
        &self,
        id: SchemaId,
        instance: &PathAwareValue<'_>,
        report: &mut ValidationReport,
    ) -> bool {
        let schema = self.graph.schema(id);
        let before = report.len();
        for keyword in schema.keywords() {
            if let Some(ty) = keyword.applicable_type() {
                if !JsonTypeSet::empty().with(ty).accepts(instance.value()) {
                    continue;
                }
            }
            tracing::trace!(
                schema = %schema.location(),
                pointer = %instance.pointer(),
                keyword = keyword.label(),
                "checking keyword"
            );
            keywords::check(self, schema, keyword, instance, report);
        }
        report.len() == before
    }

    /// Validate into a fresh report.
    pub(crate) fn evaluate(&self, id: SchemaId, instance: &PathAwareValue<'_>) -> ValidationReport {
        let mut report = ValidationReport::new();
        self.validate_schema(id, instance, &mut report);
        report
    }

    /// True when `instance` passes node `id`.
    pub(crate) fn matches(&self, id: SchemaId, instance: &PathAwareValue<'_>) -> bool {
        self.evaluate(id, instance).is_valid()
    }
}

//! # Validation Reports
//!
//! A [`ValidationReport`] collects every [`ValidationError`] found by one
//! validation call. Errors form a tree: combinators and folded child
//! reports attach the failures that explain them as `causes`.
//!
//! ## Folding
//!
//! Combinators validate each branch into its own report and fold it into
//! the parent with [`ValidationReport::add_report`]. A child report with one
//! error contributes that error unchanged; one with several contributes a
//! single aggregate (`validation.multiple.errors`) whose causes are the
//! child's errors. An empty child report contributes nothing.
//!
//! ## Rendering
//!
//! `Display` prints errors depth-first, causes before the error they
//! explain, four lines each:
//!
//! ```text
//! /items/2
//! Keyword: minimum
//! Message: 1 is less than the minimum of 3
//! Schema : file:///schemas/order.json#/properties/items/items
//! ```

use std::fmt;

use jsv_schema::{KeywordName, Schema};
use serde::Serialize;

use crate::instance::PathAwareValue;

/// Code of the aggregate error produced when folding a multi-error report.
pub const MULTIPLE_ERRORS_CODE: &str = "validation.multiple.errors";

/// Code of the error produced by the boolean schema `false`.
pub const FALSE_SCHEMA_CODE: &str = "validation.schema.false";

/// Code of the error produced when a `$ref` loop re-enters a schema at the
/// same instance value.
pub const REFERENCE_CYCLE_CODE: &str = "validation.reference.cycle";

/// One validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// JSON Pointer into the instance; `""` for the root.
    pub pointer_to_violation: String,
    /// The failing keyword, or `None` for structural failures.
    pub keyword: Option<KeywordName>,
    /// Human-readable description.
    pub message: String,
    /// Machine-readable code, `validation.keyword.<keyword>` for keyword
    /// failures.
    pub code: String,
    /// Unique URI of the violated schema node.
    pub schema_location: String,
    /// Failures that explain this one.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<ValidationError>,
}

impl ValidationError {
    /// A failure of `keyword` in `schema` at `instance`.
    pub fn keyword(
        instance: &PathAwareValue<'_>,
        schema: &Schema,
        keyword: KeywordName,
        message: impl Into<String>,
    ) -> Self {
        Self {
            pointer_to_violation: instance.pointer(),
            keyword: Some(keyword),
            message: message.into(),
            code: keyword.code(),
            schema_location: schema.unique_uri().to_string(),
            causes: Vec::new(),
        }
    }

    /// A failure not tied to a single keyword.
    pub fn structural(
        instance: &PathAwareValue<'_>,
        schema: &Schema,
        code: &str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            pointer_to_violation: instance.pointer(),
            keyword: None,
            message: message.into(),
            code: code.to_string(),
            schema_location: schema.unique_uri().to_string(),
            causes: Vec::new(),
        }
    }

    /// Attach explaining failures.
    pub fn with_causes(mut self, causes: Vec<ValidationError>) -> Self {
        self.causes = causes;
        self
    }

    /// Number of errors in this tree, this one included.
    pub fn count(&self) -> usize {
        1 + self.causes.iter().map(ValidationError::count).sum::<usize>()
    }

    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cause in &self.causes {
            cause.render(f)?;
        }
        if self.pointer_to_violation.is_empty() {
            writeln!(f, "(root)")?;
        } else {
            writeln!(f, "{}", self.pointer_to_violation)?;
        }
        match self.keyword {
            Some(keyword) => writeln!(f, "Keyword: {keyword}")?,
            None => writeln!(f, "Keyword: (none)")?,
        }
        writeln!(f, "Message: {}", self.message)?;
        writeln!(f, "Schema : {}", self.schema_location)?;
        writeln!(f)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f)
    }
}

/// The errors found by one validation call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    errors: Vec<ValidationError>,
}

impl ValidationReport {
    /// An empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no error was ever added.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Top-level errors, in the order they were found.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Number of top-level errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Fold `child` into this report as at most one error. Returns whether
    /// `child` was valid.
    pub fn add_report(
        &mut self,
        child: ValidationReport,
        instance: &PathAwareValue<'_>,
        schema: &Schema,
    ) -> bool {
        match child.fold(instance, schema) {
            Some(error) => {
                self.errors.push(error);
                false
            }
            None => true,
        }
    }

    /// Collapse this report into a single error, or `None` when it is
    /// valid.
    pub fn fold(self, instance: &PathAwareValue<'_>, schema: &Schema) -> Option<ValidationError> {
        let mut errors = self.errors;
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            n => Some(
                ValidationError::structural(
                    instance,
                    schema,
                    MULTIPLE_ERRORS_CODE,
                    format!("{n} schema violations found"),
                )
                .with_causes(errors),
            ),
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return Ok(());
        }
        let total: usize = self.errors.iter().map(ValidationError::count).sum();
        writeln!(f, "=== Validation failed: {total} error(s) ===")?;
        writeln!(f)?;
        for error in &self.errors {
            error.render(f)?;
        }
        Ok(())
    }
}

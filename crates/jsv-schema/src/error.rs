//! # Schema Loading Errors
//!
//! Every fatal loading failure carries the [`SchemaLocation`] of the node
//! that caused it, so messages point at the offending part of the schema
//! document. Non-fatal problems are not errors; they go to the
//! [`LoadingReport`](crate::report::LoadingReport).

use jsv_core::{Draft, LocationError, SchemaLocation};
use thiserror::Error;

/// Fatal error while loading, resolving or writing a schema.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A constraint keyword holds a value of the wrong type or shape.
    #[error("{location}: invalid value for keyword '{keyword}': {reason}")]
    InvalidKeyword {
        /// The schema node holding the keyword.
        location: SchemaLocation,
        /// Keyword name as written.
        keyword: String,
        /// What is wrong with the value.
        reason: String,
    },

    /// A value that must be a schema is not one.
    #[error("{location}: invalid schema: {reason}")]
    InvalidSchema {
        /// Where the non-schema value was found.
        location: SchemaLocation,
        /// What was found instead.
        reason: String,
    },

    /// A `$ref` whose target cannot be located.
    #[error("{location}: cannot resolve $ref '{reference}': {reason}")]
    UnresolvableRef {
        /// The node holding the `$ref`.
        location: SchemaLocation,
        /// The reference as written.
        reference: String,
        /// Why resolution failed.
        reason: String,
    },

    /// A required key is absent from a schema node.
    #[error("{pointer}: Missing value at key [{key}]")]
    MissingKey {
        /// The node that was searched.
        location: SchemaLocation,
        /// JSON Pointer fragment of the searched node.
        pointer: String,
        /// The absent key.
        key: String,
    },

    /// A referenced document could not be fetched.
    #[error("cannot fetch document '{uri}': {source}")]
    Fetch {
        /// Absolute URI of the document.
        uri: String,
        /// Underlying fetch failure.
        #[source]
        source: FetchError,
    },

    /// The schema graph uses a construct the target draft cannot express.
    #[error("{location}: cannot express '{keyword}' in {draft}: {reason}")]
    IncompatibleDraft {
        /// The node that cannot be written.
        location: SchemaLocation,
        /// The keyword that has no equivalent.
        keyword: String,
        /// Target draft.
        draft: Draft,
        /// Why the keyword cannot be written.
        reason: String,
    },

    /// URI or pointer arithmetic failed.
    #[error(transparent)]
    Location(#[from] LocationError),
}

impl SchemaError {
    pub(crate) fn invalid_keyword(
        location: &SchemaLocation,
        keyword: &str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidKeyword {
            location: location.clone(),
            keyword: keyword.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing_key(location: &SchemaLocation, key: &str) -> Self {
        Self::MissingKey {
            pointer: location.json_pointer_fragment(),
            location: location.clone(),
            key: key.to_string(),
        }
    }

    pub(crate) fn unresolvable(
        location: &SchemaLocation,
        reference: &str,
        reason: impl Into<String>,
    ) -> Self {
        Self::UnresolvableRef {
            location: location.clone(),
            reference: reference.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn incompatible(
        location: &SchemaLocation,
        keyword: &str,
        draft: Draft,
        reason: impl Into<String>,
    ) -> Self {
        Self::IncompatibleDraft {
            location: location.clone(),
            keyword: keyword.to_string(),
            draft,
            reason: reason.into(),
        }
    }

    /// The schema location this error points at, when it has one.
    pub fn location(&self) -> Option<&SchemaLocation> {
        match self {
            Self::InvalidKeyword { location, .. }
            | Self::InvalidSchema { location, .. }
            | Self::UnresolvableRef { location, .. }
            | Self::MissingKey { location, .. }
            | Self::IncompatibleDraft { location, .. } => Some(location),
            Self::Fetch { .. } | Self::Location(_) => None,
        }
    }
}

/// Failure to retrieve a schema document.
#[derive(Error, Debug)]
pub enum FetchError {
    /// No document is known under this URI.
    #[error("no document registered for '{0}'")]
    NotFound(String),

    /// Reading the document failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not well-formed JSON or YAML.
    #[error("parse error: {0}")]
    Parse(String),

    /// The fetcher does not handle this URI scheme.
    #[error("unsupported URI scheme '{0}'")]
    UnsupportedScheme(String),
}

//! # Error Types
//!
//! Errors raised by the foundational types. All errors use `thiserror`
//! for derive-based `Display` and `Error` implementations. Higher layers
//! wrap these with the schema location they occurred at.

use thiserror::Error;

/// Error while building or resolving a URI or JSON Pointer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    /// The text is not a valid absolute URI.
    #[error("invalid URI '{uri}': {reason}")]
    InvalidUri {
        /// The offending text.
        uri: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// A URI reference could not be resolved against a base URI.
    #[error("cannot resolve '{reference}' against '{base}': {reason}")]
    Unresolvable {
        /// The relative or absolute reference.
        reference: String,
        /// The base URI in effect.
        base: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// The text is not a syntactically valid JSON Pointer.
    #[error("malformed JSON pointer '{pointer}': {reason}")]
    MalformedPointer {
        /// The offending pointer text.
        pointer: String,
        /// What is wrong with it.
        reason: String,
    },
}

/// Error while reading a JSON number as a decimal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NumberError {
    /// The literal is not a decimal number.
    #[error("invalid decimal literal '{0}'")]
    InvalidLiteral(String),

    /// The value is not a JSON number at all.
    #[error("expected a number, found {0}")]
    NotANumber(String),
}

/// A draft selector string that does not name a supported draft.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown draft '{0}' (expected 3, 4, 5 or 6)")]
pub struct UnknownDraft(pub String);

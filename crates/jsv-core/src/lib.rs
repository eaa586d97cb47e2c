//! # jsv-core — Foundational Types for jsv
//!
//! This crate is the leaf of the jsv workspace. It defines the primitives
//! every other crate builds on: where a schema node lives, how a JSON value
//! is addressed, which draft a document speaks, and how numbers compare.
//! It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Locations are values.** [`SchemaLocation`] is an immutable triple of
//!    document URI, JSON path and resolution scope. Its unique URI is derived
//!    on demand and never stored, so it can never drift out of sync.
//!
//! 2. **Paths are typed.** [`JsonPath`] holds [`PathToken`]s (object keys and
//!    array indices) rather than pre-rendered strings. Rendering to a JSON
//!    Pointer or a URI fragment happens at the edge.
//!
//! 3. **Numbers keep their text.** [`JsonNumber`] is an arbitrary-precision
//!    decimal that remembers the scale it was written with. Comparisons use
//!    decimal arithmetic, never binary floating point, and
//!    [`lexically_equal`] treats `1.0` and `1.00` as different literals.
//!
//! 4. **Drafts are detected once.** [`Draft`] maps `$schema` URIs to a
//!    draft selector. Draft-specific behavior lives in the extraction layer of
//!    `jsv-schema`; nothing downstream branches on the draft.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `jsv-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod draft;
pub mod error;
pub mod json_type;
pub mod location;
pub mod number;
pub mod pointer;

// Re-export primary types for ergonomic imports.
pub use draft::Draft;
pub use error::{LocationError, NumberError, UnknownDraft};
pub use json_type::{JsonType, JsonTypeSet};
pub use location::SchemaLocation;
pub use number::{lexically_equal, JsonNumber};
pub use pointer::{JsonPath, PathToken};

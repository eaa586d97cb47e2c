//! # jsv-schema — Schema Loading
//!
//! Reads JSON Schema documents (drafts 3, 4, 5 and 6) into an immutable,
//! draft-neutral [`SchemaGraph`] that the validator walks.
//!
//! ## Loading (`loader`, `resolver`, `extract`)
//!
//! [`SchemaLoader`] registers the root document and hands it to a
//! [`ReferenceResolver`], which owns the node cache and arena. Each schema
//! object is read by the [`ExtractionPipeline`], a fixed sequence of
//! [`KeywordExtractor`]s that each own one keyword family and branch on the
//! document's draft. `$ref`s are resolved during extraction; a node is
//! cached before its keywords are read, so cycles close on themselves.
//!
//! ## Fetching (`fetch`)
//!
//! Documents outside the root are obtained through a [`DocumentFetcher`].
//! File, in-memory and chained fetchers are provided.
//!
//! ## Writing (`writer`)
//!
//! [`write_schema`] renders a node back to JSON for a chosen draft, failing
//! with [`SchemaError::IncompatibleDraft`] when the draft cannot express it.
//!
//! ## Crate Policy
//!
//! - Depends only on `jsv-core` internally.
//! - Fatal problems are [`SchemaError`]s carrying the offending location;
//!   advisory ones go to the [`LoadingReport`].
//! - A finished [`SchemaGraph`] is immutable and `Send + Sync`.

pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod keyword;
pub mod loader;
pub mod report;
pub mod resolver;
pub mod schema;
pub mod writer;

pub use config::LoaderConfig;
pub use error::{FetchError, SchemaError};
pub use extract::{ExtractionContext, ExtractionPipeline, KeywordExtractor};
pub use fetch::{ChainFetcher, DocumentFetcher, FileFetcher, InMemoryFetcher, NoFetch};
pub use keyword::{
    Additional, ArrayKeyword, Dependency, Items, Keyword, KeywordName, NumberKeyword,
    ObjectKeyword, Pattern, RefKeyword, StringKeyword, TypeKeyword,
};
pub use loader::{load, LoadedSchema, SchemaLoader};
pub use report::{DiagnosticKind, LoadingDiagnostic, LoadingReport};
pub use resolver::ReferenceResolver;
pub use schema::{Schema, SchemaBuilder, SchemaGraph, SchemaId};
pub use writer::{write_graph, write_schema};

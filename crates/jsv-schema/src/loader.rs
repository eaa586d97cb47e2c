//! # Schema Loader
//!
//! Entry point for turning a JSON document into a [`SchemaGraph`]. A
//! [`SchemaLoader`] is reusable: each load gets its own
//! [`ReferenceResolver`], so loads never share cached nodes.

use std::path::Path;

use jsv_core::SchemaLocation;
use serde_json::Value;
use url::Url;

use crate::config::LoaderConfig;
use crate::error::{FetchError, SchemaError};
use crate::extract::ExtractionPipeline;
use crate::fetch::{read_document, DocumentFetcher, FileFetcher};
use crate::report::LoadingReport;
use crate::resolver::ReferenceResolver;
use crate::schema::SchemaGraph;

/// The result of a successful load.
#[derive(Debug, Clone)]
pub struct LoadedSchema {
    /// The resolved graph.
    pub graph: SchemaGraph,
    /// Non-fatal problems met while loading.
    pub report: LoadingReport,
}

/// Reusable, configured schema loader.
pub struct SchemaLoader {
    config: LoaderConfig,
    fetcher: Box<dyn DocumentFetcher>,
    pipeline: ExtractionPipeline,
}

impl Default for SchemaLoader {
    fn default() -> Self {
        Self::new(LoaderConfig::default())
    }
}

impl SchemaLoader {
    /// A loader that fetches `file://` documents.
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            config,
            fetcher: Box::new(FileFetcher),
            pipeline: ExtractionPipeline::standard(),
        }
    }

    /// Replace the document fetcher.
    pub fn with_fetcher(mut self, fetcher: impl DocumentFetcher + 'static) -> Self {
        self.fetcher = Box::new(fetcher);
        self
    }

    /// Replace the extraction pipeline.
    pub fn with_pipeline(mut self, pipeline: ExtractionPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load `schema`, giving it the configured base URI or a fresh
    /// anonymous one.
    pub fn load(&self, schema: &Value) -> Result<LoadedSchema, SchemaError> {
        let location = match &self.config.base_uri {
            Some(base) => SchemaLocation::parse_root(base)?,
            None => SchemaLocation::anonymous_root()?,
        };
        self.load_document(location.document_uri().clone(), schema.clone())
    }

    /// Load `schema` as the document at `uri`.
    pub fn load_with_uri(&self, schema: &Value, uri: &str) -> Result<LoadedSchema, SchemaError> {
        let location = SchemaLocation::parse_root(uri)?;
        self.load_document(location.document_uri().clone(), schema.clone())
    }

    /// Fetch the document at `uri` and load it.
    pub fn load_uri(&self, uri: &str) -> Result<LoadedSchema, SchemaError> {
        let location = SchemaLocation::parse_root(uri)?;
        let uri = location.document_uri().clone();
        let document = self.fetcher.fetch(&uri).map_err(|source| SchemaError::Fetch {
            uri: uri.to_string(),
            source,
        })?;
        self.load_document(uri, document)
    }

    /// Read a JSON or YAML schema file and load it under its `file://` URI,
    /// so relative references resolve against its directory.
    pub fn load_path(&self, path: &Path) -> Result<LoadedSchema, SchemaError> {
        let fetch_error = |source: FetchError| SchemaError::Fetch {
            uri: path.display().to_string(),
            source,
        };
        let absolute = path
            .canonicalize()
            .map_err(|e| fetch_error(FetchError::Io(e)))?;
        let uri = Url::from_file_path(&absolute)
            .map_err(|()| fetch_error(FetchError::NotFound(absolute.display().to_string())))?;
        let document = read_document(&absolute).map_err(fetch_error)?;
        self.load_document(uri, document)
    }

    fn load_document(&self, uri: Url, document: Value) -> Result<LoadedSchema, SchemaError> {
        let mut report = LoadingReport::new();
        let mut resolver =
            ReferenceResolver::new(&self.config, self.fetcher.as_ref(), &self.pipeline);
        let root = resolver.load_root(uri.clone(), document, &mut report)?;
        let graph = resolver.finish(root, &mut report)?;
        tracing::debug!(
            uri = %uri,
            nodes = graph.len(),
            diagnostics = report.len(),
            "schema loaded"
        );
        Ok(LoadedSchema { graph, report })
    }
}

/// Load `schema` with default settings.
pub fn load(schema: &Value) -> Result<SchemaGraph, SchemaError> {
    SchemaLoader::default().load(schema).map(|loaded| loaded.graph)
}

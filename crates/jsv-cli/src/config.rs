//! # CLI Configuration
//!
//! Optional settings file passed with `--config`. Either JSON or YAML;
//! both sections may be omitted. Command-line flags win over the file.
//!
//! ```yaml
//! loader:
//!   default_draft: draft4
//!   allow_remote: false
//! validator:
//!   format_policy: strict
//! ```

use std::path::Path;

use anyhow::Context;
use jsv_schema::fetch::read_document;
use jsv_schema::LoaderConfig;
use jsv_validator::ValidatorConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    #[serde(default)]
    pub loader: LoaderConfig,
    #[serde(default)]
    pub validator: ValidatorConfig,
}

impl CliConfig {
    /// Read a config file. The format follows the extension.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let document = read_document(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = serde_json::from_value(document)
            .with_context(|| format!("invalid config {}", path.display()))?;
        tracing::debug!(config = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// [`CliConfig::load`] when a path is given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

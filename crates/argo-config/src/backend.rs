//! Backend selection.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Which search backend serves the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// A remote Elasticsearch cluster.
    #[default]
    Elasticsearch,
    /// JSON fixture files loaded into memory at startup.
    Fixtures,
}

fn default_fixtures_dir() -> String {
    "fixtures".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub kind: BackendKind,

    /// Directory holding one sub-directory of `*.json` documents per index.
    #[serde(default = "default_fixtures_dir")]
    pub fixtures_dir: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::default(),
            fixtures_dir: default_fixtures_dir(),
        }
    }
}

impl BackendConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.kind == BackendKind::Fixtures && self.fixtures_dir.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "backend.fixtures_dir".into(),
                reason: "must not be empty when backend.kind is 'fixtures'".into(),
            });
        }
        Ok(())
    }
}

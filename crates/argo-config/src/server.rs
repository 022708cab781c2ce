//! HTTP server and pagination configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_bind() -> String {
    "127.0.0.1:8000".to_string()
}

const fn default_page_size() -> usize {
    20
}

const fn default_max_page_size() -> usize {
    100
}

const fn default_max_result_window() -> usize {
    10_000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Socket address the HTTP server listens on.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Prefix for `next`/`previous` page links (e.g. `https://api.example.org`).
    /// Empty yields root-relative links.
    #[serde(default)]
    pub base_url: String,

    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    /// Upper bound applied to a requested `page_size`.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,

    /// Deepest document a page may reach (`from + size`). Matches the
    /// Elasticsearch `index.max_result_window` setting.
    #[serde(default = "default_max_result_window")]
    pub max_result_window: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            base_url: String::new(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            max_result_window: default_max_result_window(),
        }
    }
}

impl ServerConfig {
    /// `base_url` without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.default_page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.default_page_size".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.max_page_size < self.default_page_size {
            return Err(ConfigError::InvalidValue {
                field: "server.max_page_size".into(),
                reason: format!(
                    "must be at least server.default_page_size ({})",
                    self.default_page_size
                ),
            });
        }
        if self.max_result_window < self.max_page_size {
            return Err(ConfigError::InvalidValue {
                field: "server.max_result_window".into(),
                reason: format!(
                    "must be at least server.max_page_size ({})",
                    self.max_page_size
                ),
            });
        }
        Ok(())
    }
}

//! # argo-config
//!
//! Layered configuration loading for Argo using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`ARGO_*` prefix, `__` as separator)
//! 2. An explicit config file passed on the command line
//! 3. Project-level `.argo/config.toml`
//! 4. User-level `~/.config/argo/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `ARGO_ELASTICSEARCH__TIMEOUT_SECS` -> `elasticsearch.timeout_secs`,
//! `ARGO_SERVER__BIND` -> `server.bind`, etc. The `__` (double underscore)
//! separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use argo_config::ArgoConfig;
//!
//! let config = ArgoConfig::load_with_dotenv(None).expect("config");
//! config.validate().expect("valid config");
//! println!("serving on {}", config.server.bind);
//! ```

mod backend;
mod elasticsearch;
mod error;
mod indices;
mod server;

pub use backend::{BackendConfig, BackendKind};
pub use elasticsearch::ElasticsearchConfig;
pub use error::ConfigError;
pub use indices::IndexConfig;
pub use server::ServerConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ArgoConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub elasticsearch: ElasticsearchConfig,
    #[serde(default)]
    pub indices: IndexConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl ArgoConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingFile`] if `explicit` names a file that
    /// does not exist, or [`ConfigError::Figment`] if extraction fails.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::figment(explicit)?.extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load(explicit)
    }

    /// Build the figment provider chain.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingFile`] if `explicit` does not exist.
    pub fn figment(explicit: Option<&Path>) -> Result<Figment, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(".argo/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::MissingFile {
                    path: path.display().to_string(),
                });
            }
            figment = figment.merge(Toml::file(path));
        }

        Ok(figment.merge(Env::prefixed("ARGO_").split("__")))
    }

    /// Check cross-field constraints that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.backend.kind {
            BackendKind::Elasticsearch => self.elasticsearch.validate()?,
            BackendKind::Fixtures => self.backend.validate()?,
        }
        self.server.validate()
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("argo").join("config.toml"))
    }
}

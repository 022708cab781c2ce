//! Elasticsearch connection configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ConfigError;

fn default_hosts() -> Vec<String> {
    vec!["http://localhost:9200".to_string()]
}

/// Default request timeout in seconds.
const fn default_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ElasticsearchConfig {
    /// Cluster nodes, tried in order when a connection cannot be made.
    #[serde(default = "default_hosts")]
    pub hosts: Vec<String>,

    /// Timeout applied to every backend request, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Basic-auth user name; empty disables authentication.
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,
}

impl Default for ElasticsearchConfig {
    fn default() -> Self {
        Self {
            hosts: default_hosts(),
            timeout_secs: default_timeout_secs(),
            username: String::new(),
            password: String::new(),
        }
    }
}

impl ElasticsearchConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Whether basic-auth credentials are configured.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty()
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.hosts.iter().all(|h| h.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "elasticsearch.hosts".into(),
                reason: "at least one host is required".into(),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "elasticsearch.timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

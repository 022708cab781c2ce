use argo_config::{ArgoConfig, IndexConfig};
use argo_core::ResourceKind;
use argo_search::PageLimits;

use crate::resources::ResourceRegistry;

/// Shared, read-only state of the HTTP service.
#[derive(Debug)]
pub struct AppState<B> {
    pub backend: B,
    pub registry: ResourceRegistry,
    pub indices: IndexConfig,
    pub limits: PageLimits,
    /// Prefix of generated `next`/`previous` links, without trailing slash.
    pub base_url: String,
}

impl<B> AppState<B> {
    #[must_use]
    pub fn new(backend: B, registry: ResourceRegistry, config: &ArgoConfig) -> Self {
        Self {
            backend,
            registry,
            indices: config.indices.clone(),
            limits: PageLimits::from(&config.server),
            base_url: config.server.base_url().to_string(),
        }
    }

    /// Index name bound to `kind`.
    #[must_use]
    pub fn index_for(&self, kind: ResourceKind) -> String {
        self.indices.name_for(kind)
    }
}

use anyhow::Context;
use argo_config::ArgoConfig;
use argo_core::ResourceKind;
use argo_search::{AnyBackend, SearchBackend};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct IndexStatus {
    pub resource: &'static str,
    pub index: String,
    pub status: &'static str,
}

/// Probe the index of every resource kind.
pub async fn probe<B: SearchBackend>(
    backend: &B,
    config: &ArgoConfig,
) -> anyhow::Result<Vec<IndexStatus>> {
    let mut statuses = Vec::with_capacity(ResourceKind::ALL.len());
    for kind in ResourceKind::ALL {
        let index = config.indices.name_for(kind);
        let exists = backend
            .index_exists(&index)
            .await
            .with_context(|| format!("failed to probe index {index}"))?;
        statuses.push(IndexStatus {
            resource: kind.plural(),
            index,
            status: if exists { "ok" } else { "missing" },
        });
    }
    Ok(statuses)
}

pub async fn handle(config: &ArgoConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let backend = AnyBackend::from_config(config).context("failed to initialize search backend")?;
    tracing::debug!(backend = backend.name(), "checking indices");

    let statuses = probe(&backend, config).await?;
    output(&statuses, flags.format)?;

    let missing = statuses.iter().filter(|s| s.status == "missing").count();
    if missing > 0 {
        anyhow::bail!("{missing} resource index(es) missing on the {} backend", backend.name());
    }
    Ok(())
}

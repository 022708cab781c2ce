use anyhow::Context;
use argo_config::ArgoConfig;

use crate::cli::GlobalFlags;

/// Load and validate configuration, honouring `--config` and `.env`.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<ArgoConfig> {
    let config = ArgoConfig::load_with_dotenv(flags.config.as_deref())
        .context("failed to load argo configuration")?;
    config.validate().context("invalid argo configuration")?;
    tracing::debug!(
        backend = ?config.backend.kind,
        bind = %config.server.bind,
        "configuration loaded"
    );
    Ok(config)
}

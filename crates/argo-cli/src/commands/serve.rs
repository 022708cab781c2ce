use std::sync::Arc;

use anyhow::Context;
use argo_api::{AppState, ResourceRegistry, router};
use argo_config::ArgoConfig;
use argo_search::AnyBackend;

use crate::cli::ServeArgs;

/// Bind the listener and serve the API until interrupted.
pub async fn handle(args: &ServeArgs, config: &ArgoConfig) -> anyhow::Result<()> {
    let bind = args.bind.as_deref().unwrap_or(&config.server.bind);

    let backend = AnyBackend::from_config(config).context("failed to initialize search backend")?;
    let backend_name = backend.name();
    let registry = ResourceRegistry::builtin().context("invalid resource declarations")?;
    let state = Arc::new(AppState::new(backend, registry, config));

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    let local = listener
        .local_addr()
        .context("failed to read listener address")?;
    tracing::info!(address = %local, backend = backend_name, "serving argo api");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server failed")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(%error, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}

use argo_config::ArgoConfig;

use crate::cli::{Commands, GlobalFlags};

pub mod check;
pub mod resources;
pub mod serve;

/// Run one parsed command.
pub async fn dispatch(
    command: Commands,
    config: &ArgoConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Serve(args) => serve::handle(&args, config).await,
        Commands::Resources => resources::handle(config, flags),
        Commands::Check => check::handle(config, flags).await,
    }
}

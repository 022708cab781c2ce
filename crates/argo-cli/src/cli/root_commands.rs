use clap::{Args, Subcommand};

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Serve the HTTP API
    Serve(ServeArgs),
    /// List the resource endpoints with their filters and orderings
    Resources,
    /// Check that every resource index exists on the backend
    Check,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Listen address, overriding `server.bind`
    #[arg(long)]
    pub bind: Option<String>,
}

//! # aqua CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use clap::Parser;

/// AquaMatch — water delivery offer/request matching service.
///
/// Runs the HTTP API that lets providers see and offer on pending
/// delivery requests and lets consumers accept exactly one offer.
#[derive(Parser, Debug)]
#[command(name = "aqua", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the HTTP matching service.
    Serve(aqua_cli::serve::ServeArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => aqua_cli::serve::run(args).await,
    }
}

//! # Serve Subcommand
//!
//! Runs the HTTP matching service: wires the in-memory store, the
//! notification channel with its drain task, and the Axum router, then
//! serves until the process is stopped.

use std::sync::Arc;

use anyhow::Context;
use clap::Args;

use aqua_api::AppState;
use aqua_core::{ProviderProfile, ServiceAreaId, VerificationStatus};
use aqua_match::{ChannelSink, MemoryStore};

/// Arguments for the serve subcommand.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1")]
    pub bind: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 8080)]
    pub port: u16,

    /// Seed a demo service area and an approved provider, logging their
    /// identifiers, so the API can be exercised immediately.
    #[arg(long)]
    pub demo_seed: bool,
}

/// Run the HTTP service until interrupted.
pub async fn run(args: ServeArgs) -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());

    if args.demo_seed {
        seed_demo(&store);
    }

    // Notification delivery transports live outside this service; the
    // channel receiver stands in for them and is drained to the log.
    let (sink, mut events) = ChannelSink::new();
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            tracing::info!(?event, "notification dispatched");
        }
    });

    let state = AppState::new(store, Arc::new(sink));
    let app = aqua_api::app(state);

    let addr = format!("{}:{}", args.bind, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "aqua-match listening");
    axum::serve(listener, app)
        .await
        .context("server terminated")?;
    Ok(())
}

fn seed_demo(store: &MemoryStore) {
    let area = ServiceAreaId::new();
    let provider = ProviderProfile {
        id: aqua_core::ProviderId::new(),
        name: "Aguatero Demo".to_string(),
        verification: VerificationStatus::Approved,
        available: true,
        service_areas: vec![area],
    };
    tracing::info!(area = %area, provider = %provider.id, "demo seed created");
    store.upsert_provider(provider);
}

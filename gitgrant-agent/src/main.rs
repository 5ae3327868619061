//! gitgrant-agent: reconciles permission-grant records with a code-hosting
//! service.
//!
//! This daemon:
//! - Loads a desired-state document (provider configs + records)
//! - Builds the connector registry, one connector per record kind
//! - Runs reconciliation passes on a fixed interval (or once with --once)

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gitgrant_agent::agent::Agent;
use gitgrant_agent::connector::{PermissionConnector, RepositoryConnector};
use gitgrant_agent::registry::Registry;
use gitgrant_agent::state;
use gitgrant_api::MemoryStore;

/// gitgrant Agent
#[derive(Parser, Debug)]
#[command(name = "gitgrant-agent", version, about)]
struct Args {
    /// Path to the desired-state document (provider configs and records)
    #[arg(long, default_value = "gitgrant-state.json")]
    state: PathBuf,

    /// Seconds between reconciliation passes
    #[arg(long, default_value = "60")]
    poll_interval: u64,

    /// Per-record cycle deadline in seconds
    #[arg(long, default_value = "60")]
    cycle_timeout: u64,

    /// Run a single pass and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gitgrant_agent=info,hyper=warn,reqwest=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let store = Arc::new(MemoryStore::new());
    let document = state::load(&args.state).await?;
    info!(
        configs = document.provider_configs.len(),
        records = document.records.len(),
        "loaded desired state from {}",
        args.state.display()
    );
    state::seed(&store, document).await?;

    let mut registry = Registry::new();
    registry.register(Box::new(PermissionConnector::new(store.clone())));
    registry.register(Box::new(RepositoryConnector::new(store.clone())));

    let agent = Agent::new(store.clone(), Arc::new(registry))
        .with_cycle_timeout(Duration::from_secs(args.cycle_timeout));

    if args.once {
        return agent.run_once().await;
    }

    tokio::select! {
        result = agent.run(Duration::from_secs(args.poll_interval)) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("shutting down");
            Ok(())
        }
    }
}

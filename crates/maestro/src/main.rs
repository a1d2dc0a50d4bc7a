mod cli;
mod config;

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use cli::{Cli, Commands};
use config::Config;
use encore_core::{
    CacheStore, MediaRecord, MemoryStore, Principal, SearchService, StaticTokenVerifier,
    SystemClock,
};
use encore_gateway::{start_server, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    encore_core::init_logging();

    let cli = Cli::parse();
    let config = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            serve(&config, &host, port).await?;
        }
        Commands::Check => {
            let catalog = load_catalog(Path::new(&config.catalog.path))?;
            info!(
                records = catalog.len(),
                tokens = config.auth.tokens.len(),
                "config and catalog are valid"
            );
        }
    }

    Ok(())
}

async fn serve(config: &Config, host: &str, port: u16) -> Result<()> {
    let catalog = load_catalog(Path::new(&config.catalog.path))?;
    info!(records = catalog.len(), "catalog loaded");

    let store = Arc::new(MemoryStore::new(catalog));

    let tokens = config
        .auth
        .tokens
        .iter()
        .map(|(token, entry)| {
            (
                token.clone(),
                Principal {
                    uid: entry.uid.clone(),
                    email: entry.email.clone(),
                },
            )
        })
        .collect::<Vec<_>>();
    if tokens.is_empty() {
        info!("no tokens configured, auth disabled");
    }
    let verifier = Arc::new(StaticTokenVerifier::new(tokens));

    let cache = Arc::new(CacheStore::with_limits(
        Arc::new(SystemClock),
        Duration::from_secs(config.cache.ttl_secs),
        config.cache.max_entries,
    ));

    let service = Arc::new(SearchService::new(verifier, store, cache));
    let state = AppState {
        service,
        allowed_origins: config.server.allowed_origins.clone(),
    };

    start_server(state, host, port).await
}

fn load_catalog(path: &Path) -> Result<Vec<MediaRecord>> {
    let content =
        fs::read_to_string(path).context(format!("Failed to read catalog file: {:?}", path))?;
    let records: Vec<MediaRecord> =
        serde_json::from_str(&content).context("Failed to parse catalog JSON")?;
    Ok(records)
}

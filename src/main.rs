use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use querify::remote::{RemoteClient, RemoteConfig};
use querify::server::{CommandContext, QueryServer};
use querify::store::SessionStore;
use querify::AppState;

/// Parse command line arguments for `--<flag> <value>`
fn parse_flag(args: &[String], flag: &str) -> Option<String> {
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
    }
    None
}

#[tokio::main]
async fn main() -> Result<()> {
    // Stdout carries responses, so logging goes to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("querify=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let args: Vec<String> = env::args().collect();

    let data_dir = parse_flag(&args, "--data-dir")
        .map(PathBuf::from)
        .unwrap_or_else(SessionStore::default_dir);

    let api_url = parse_flag(&args, "--api-url").or_else(|| env::var("QUERIFY_API_URL").ok());

    info!("Starting querify server with data dir: {:?}", data_dir);

    let store = SessionStore::new(data_dir);
    let state = Arc::new(AppState::restore(store).await);

    let remote = match api_url {
        Some(url) => {
            let config = RemoteConfig::new(&url)?;
            info!("Using remote query backend at {}", config.base_url);
            Some(RemoteClient::new(config)?)
        }
        None => {
            info!("No remote query backend configured, using built-in templates");
            None
        }
    };

    let mut server = QueryServer::new(CommandContext::new(state, remote));
    server.run().await
}

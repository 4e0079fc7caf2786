//! btcwatch - Bitcoin price proxy
//!
//! Serves `/bitcoin-info` from an in-memory cache that refreshes from the
//! upstream API once its TTL passes and keeps serving the last good snapshot
//! while the upstream is down.

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use btcwatch::cache::StaleTolerantCache;
use btcwatch::cli::{Cli, ServerConfig};
use btcwatch::server::{build_router, AppState};
use btcwatch::upstream::BitcoinClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env before parsing so its values feed clap's env fallbacks
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = match ServerConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match dotenv {
        Ok(_) => info!("Loaded environment variables from .env file"),
        Err(_) => info!("No .env file found, using system environment variables"),
    }

    let mut client = BitcoinClient::with_timeout(&config.api_url, config.timeout)?;
    match &config.api_key {
        Some(api_key) => client = client.with_api_key(api_key),
        None => warn!("BITCOIN_API_KEY not set, upstream requests are sent without a key"),
    }

    info!(
        upstream = %config.api_url,
        ttl_secs = config.ttl.as_secs(),
        "Initializing bitcoin cache"
    );
    let cache = StaleTolerantCache::new(config.ttl, client)?;
    let router = build_router(AppState::new(cache));

    let listener = TcpListener::bind(config.bind_address()).await?;
    info!("Server is running at http://{}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }

    info!("Shutting down gracefully...");
}

use anyhow::{Context, Result};
use axum::Router;
use std::{net::SocketAddr, sync::Arc};
use tokio::{net::TcpListener, sync::RwLock};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, fmt};

use showroom_rust::{
    catalog::Catalog,
    config::Settings,
    persistence::{JsonFileStore, MemoryStore, SessionStore},
    routes,
    session::Session,
};

// Bundled inventory unless a catalog file is configured
fn load_catalog(settings: &Settings) -> Result<Catalog> {
    match settings.catalog_path.as_deref() {
        Some(path) => {
            tracing::info!("Loading catalog from {}", path);
            Catalog::from_path(path).with_context(|| format!("Failed to load catalog from '{}'", path))
        }
        None => {
            tracing::info!("Using the bundled catalog.");
            Catalog::seed().context("Failed to parse the bundled catalog")
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file first. Ignore errors (e.g., file not found)
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "showroom_rust=info,tower_http=info".into())) // Default to info if RUST_LOG not set
        .with(fmt::layer())
        .init();

    tracing::info!("Initializing showroom server...");

    // Load configuration
    let settings = match Settings::new() {
        Ok(s) => {
            tracing::info!("Configuration loaded successfully.");
            s
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    let catalog = Arc::new(load_catalog(&settings)?);
    tracing::info!(
        "Catalog ready: {} vehicles across {} locations.",
        catalog.len(),
        catalog.locations().len()
    );

    // One session for the lifetime of the process, shared by every handler
    let store: Arc<dyn SessionStore> = if settings.session_file.is_empty() {
        tracing::info!("No session file configured, session state will not survive a restart.");
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(JsonFileStore::new(&settings.session_file))
    };
    let session = Session::restore(catalog, store);

    let app: Router = routes::create_router(Arc::new(RwLock::new(session)));

    // Parse the server address from settings
    let addr: SocketAddr = match settings.server_address.parse() {
        Ok(a) => a,
        Err(e) => {
            tracing::error!(
                "Invalid server address format in configuration ('{}'): {}",
                settings.server_address,
                e
            );
            return Err(anyhow::anyhow!("Invalid server address format: {}", settings.server_address));
        }
    };

    let listener = match TcpListener::bind(&addr).await {
        Ok(l) => {
            tracing::info!("Server listening on {}", addr);
            l
        }
        Err(e) => {
            tracing::error!("Failed to bind to address {}: {}", addr, e);
            return Err(e.into());
        }
    };

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

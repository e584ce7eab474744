use std::net::{IpAddr, SocketAddr};
use std::process;
use std::sync::Arc;

use rustledger::{
    config::{self, StoreKind},
    routes,
    store::{MemoryStore, MongoStore, SharedStore},
    AppState,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = config::load();

    let store: SharedStore = match settings.store {
        StoreKind::Mongo => {
            match MongoStore::connect(&settings.mongodb_uri, &settings.mongodb_db).await {
                Ok(s) => Arc::new(s),
                Err(e) => {
                    tracing::error!("failed to initialize MongoDB store: {e}");
                    process::exit(1);
                }
            }
        }
        StoreKind::Memory => {
            tracing::warn!("using the in-memory store, data is lost on shutdown");
            Arc::new(MemoryStore::new())
        }
    };

    let host = match settings.host.parse::<IpAddr>() {
        Ok(ip) => ip,
        Err(e) => {
            tracing::error!("invalid HOST {:?}: {e}", settings.host);
            process::exit(1);
        }
    };
    let addr = SocketAddr::from((host, settings.port));

    let app = routes::app(AppState::new(store, settings));

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("failed to bind {addr}: {e}");
            process::exit(1);
        }
    };
    tracing::info!("listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {e}");
        process::exit(1);
    }
}

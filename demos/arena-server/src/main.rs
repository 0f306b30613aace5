//! Runnable battle server: the whole Duelgate stack behind one port.

use std::env;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use duelgate::{router, AppState};
use duelgate_store::MatchStore;
use tracing_subscriber::EnvFilter;

/// Socket address to bind. Reads the `PORT` env var (container
/// platforms set it), defaults to 8080, binds on all interfaces.
fn server_addr() -> SocketAddr {
    let port = env::var("PORT")
        .ok()
        .and_then(|v| v.parse::<u16>().ok())
        .unwrap_or(8080);
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, port))
}

/// Configure with RUST_LOG, e.g. RUST_LOG=debug,tower_http=info.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    // The store is constructed here, once, and injected everywhere.
    let store = Arc::new(MatchStore::new());
    let app = router(AppState::new(store));

    let addr = server_addr();
    tracing::info!(%addr, "duelgate listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

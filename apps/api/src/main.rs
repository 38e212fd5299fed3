mod backend_client;
mod chat;
mod config;
mod db;
mod defaults;
mod errors;
mod funnel;
mod models;
mod prediction;
mod profile;
mod recommendations;
mod roadmap;
mod routes;
mod scores;
mod state;
mod store;
#[cfg(test)]
mod testing;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::backend_client::BackendClient;
use crate::config::Config;
use crate::db::create_pool;
use crate::funnel::SessionRegistry;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{MemoryStore, PgStore, ProfileStore};

const SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ClimbTheLadder API v{}", env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn ProfileStore> = match &config.database_url {
        Some(url) => Arc::new(PgStore::new(create_pool(url).await?)),
        None => {
            warn!("DATABASE_URL not set; using in-memory store (data is lost on restart)");
            Arc::new(MemoryStore::new())
        }
    };

    let advisor = BackendClient::new(
        config.backend_url.clone(),
        config.ai_url.clone(),
        config.upstream_timeout,
    )?;
    info!(
        "Backend client initialized (backend: {}, ai: {}, timeout: {:?})",
        config.backend_url, config.ai_url, config.upstream_timeout
    );

    let sessions = SessionRegistry::with_ttl(config.session_ttl);
    spawn_session_sweeper(sessions.clone(), config.session_ttl);

    let state = AppState {
        store,
        advisor: Arc::new(advisor),
        sessions,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Periodically drops expired funnel sessions so abandoned ones do not pile up
/// between inserts.
fn spawn_session_sweeper(sessions: SessionRegistry, ttl: Duration) {
    let period = ttl.min(SWEEP_INTERVAL).max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let removed = sessions.prune_expired().await;
            if removed > 0 {
                info!("Swept {removed} expired sessions");
            }
        }
    });
}

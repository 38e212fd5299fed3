use std::sync::Arc;

use crate::backend_client::CareerAdvisor;
use crate::config::Config;
use crate::funnel::SessionRegistry;
use crate::store::ProfileStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// `PgStore` when a database is configured, `MemoryStore` otherwise.
    pub store: Arc<dyn ProfileStore>,
    /// Upstream backends. Default: `BackendClient`.
    pub advisor: Arc<dyn CareerAdvisor>,
    pub sessions: SessionRegistry,
    pub config: Config,
}

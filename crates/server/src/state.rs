use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use applog::{Clock, IngestionService, QueryService, SystemClock, TenantStores};
use std::sync::Arc;
use std::time::Instant;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Write path (shared across requests)
    pub ingestion: IngestionService,

    /// Read path (shared across requests)
    pub queries: QueryService,

    /// Storage backend name, reported by `/ready`
    pub backend: &'static str,

    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl ServerState {
    /// Open the configured stores and wire both services to them.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let stores = config
            .storage()
            .build()
            .map_err(|err| ServerError::Internal(format!("failed to open log stores: {err}")))?;
        Ok(Self::with_stores(config, stores, Arc::new(SystemClock)))
    }

    /// Build state over already-opened stores and an explicit clock.
    pub fn with_stores(config: ServerConfig, stores: TenantStores, clock: Arc<dyn Clock>) -> Self {
        let backend = stores.kind();
        let stores = Arc::new(stores);

        Self {
            config: Arc::new(config),
            ingestion: IngestionService::new(Arc::clone(&stores), clock),
            queries: QueryService::new(stores),
            backend,
            started_at: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

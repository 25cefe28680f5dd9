use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use log::info;

use crate::api::handlers::AppState;
use crate::api::routes::create_router;
use crate::config::settings::AppConfig;
use crate::database::{MemoryStatsStore, MongoStatsStore, StatsStore};

pub struct ServerService {
    port: u16,
    fixtures: Option<PathBuf>,
    config: AppConfig,
}

impl ServerService {
    pub fn new(port: u16, fixtures: Option<PathBuf>, config: AppConfig) -> Self {
        Self {
            port,
            fixtures,
            config,
        }
    }

    pub async fn run(&self) -> Result<()> {
        let store = self.build_store()?;
        let state = Arc::new(AppState::new(Arc::clone(&store)));
        let app = create_router(state, &self.config.static_dir);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        info!("Server listening on http://localhost:{}", addr.port());

        let listener = tokio::net::TcpListener::bind(addr).await?;
        let served = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await;

        store.shutdown().await;
        info!("Server stopped");
        served?;
        Ok(())
    }

    fn build_store(&self) -> Result<Arc<dyn StatsStore>> {
        match &self.fixtures {
            Some(path) => Ok(Arc::new(MemoryStatsStore::from_path(path)?)),
            None => {
                if self.config.database.uri.is_none() {
                    log::warn!("MONGODB_URI is not set; queries will fail until it is configured");
                }
                Ok(Arc::new(MongoStatsStore::new(self.config.database.clone())))
            }
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

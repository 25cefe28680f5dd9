use std::sync::Arc;

use async_trait::async_trait;
use log::info;
use mongodb::{Client, Database};
use tokio::sync::Mutex;

use crate::config::DatabaseSettings;
use crate::errors::DbError;

/// Opens and closes the underlying database handle.
#[async_trait]
pub trait Connector: Send + Sync {
    type Handle: Send + Sync;

    async fn connect(&self) -> Result<Self::Handle, DbError>;

    async fn close(&self, handle: Arc<Self::Handle>);
}

/// Lazily connected, explicitly closable database handle.
///
/// The first `acquire` connects; later calls hand out the same `Arc` until
/// `release` drops it. Connecting happens under the lock, so concurrent first
/// callers share one connection attempt.
pub struct ConnectionManager<C: Connector> {
    connector: C,
    slot: Mutex<Option<Arc<C::Handle>>>,
}

impl<C: Connector> ConnectionManager<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            slot: Mutex::new(None),
        }
    }

    pub async fn acquire(&self) -> Result<Arc<C::Handle>, DbError> {
        let mut slot = self.slot.lock().await;
        if let Some(handle) = slot.as_ref() {
            return Ok(Arc::clone(handle));
        }

        let handle = Arc::new(self.connector.connect().await?);
        *slot = Some(Arc::clone(&handle));
        Ok(handle)
    }

    /// Closes the cached handle, if any. Safe to call repeatedly.
    pub async fn release(&self) {
        let handle = self.slot.lock().await.take();
        if let Some(handle) = handle {
            self.connector.close(handle).await;
        }
    }

    pub async fn is_connected(&self) -> bool {
        self.slot.lock().await.is_some()
    }
}

pub struct MongoHandle {
    pub client: Client,
    pub db: Database,
}

pub struct MongoConnector {
    settings: DatabaseSettings,
}

impl MongoConnector {
    pub fn new(settings: DatabaseSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl Connector for MongoConnector {
    type Handle = MongoHandle;

    async fn connect(&self) -> Result<MongoHandle, DbError> {
        let uri = self.settings.uri.as_deref().ok_or(DbError::MissingUri)?;

        let client = Client::with_uri_str(uri).await?;
        let db = client.database(&self.settings.name);
        info!("Connected to MongoDB - DB: {}", self.settings.name);

        Ok(MongoHandle { client, db })
    }

    async fn close(&self, handle: Arc<MongoHandle>) {
        handle.client.clone().shutdown().await;
        info!("Closed MongoDB connection - DB: {}", self.settings.name);
    }
}

//! Application state

use anyhow::{Context, Result};
use shelfwise_core::catalog::{BestsellerFeed, Catalog, NytBestsellers, OpenLibrary, DEFAULT_CATALOG_URL};
use shelfwise_core::events::{EventBus, EventName, ListEvent, Subscription};
use shelfwise_core::storage::{LocalStorage, StorageProvider};
use shelfwise_core::{ReadingLists, RecordStore, StaticSession};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Capacity of the SSE fan-out channel
const EVENT_CAPACITY: usize = 100;

/// Server configuration read from the environment
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory for user documents (`SHELFWISE_DATA_DIR`)
    pub data_dir: PathBuf,

    /// Listen address (`SHELFWISE_ADDR`)
    pub addr: SocketAddr,

    /// Comma-separated origins or `*` (`SHELFWISE_CORS_ORIGINS`)
    pub cors_origins: Option<String>,

    /// Catalog base URL (`SHELFWISE_CATALOG_URL`)
    pub catalog_url: String,

    /// Bestseller API key (`NYT_API_KEY`)
    pub nyt_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let addr = match std::env::var("SHELFWISE_ADDR") {
            Ok(addr) => addr
                .parse()
                .with_context(|| format!("Invalid SHELFWISE_ADDR: {}", addr))?,
            Err(_) => SocketAddr::from(([127, 0, 0, 1], 3000)),
        };

        Ok(Self {
            data_dir: std::env::var("SHELFWISE_DATA_DIR")
                .unwrap_or_else(|_| "./shelfwise_data".to_string())
                .into(),
            addr,
            cors_origins: std::env::var("SHELFWISE_CORS_ORIGINS").ok(),
            catalog_url: std::env::var("SHELFWISE_CATALOG_URL")
                .unwrap_or_else(|_| DEFAULT_CATALOG_URL.to_string()),
            nyt_api_key: std::env::var("NYT_API_KEY").ok(),
        })
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Record documents for every user
    pub store: RecordStore,

    /// Bus shared by every request's reading lists
    pub events: EventBus,

    /// Book metadata lookups
    pub catalog: Arc<dyn Catalog>,

    /// Curated bestseller lists
    pub bestsellers: Arc<dyn BestsellerFeed>,

    /// Channel for SSE events
    pub event_tx: broadcast::Sender<ListEvent>,

    /// Forwards bus events into `event_tx` while the state is alive
    _bridge: Arc<Subscription>,
}

impl AppState {
    /// Create state backed by the local data directory
    pub async fn new(config: &Config) -> Result<Self> {
        tokio::fs::create_dir_all(config.data_dir.join("users"))
            .await
            .with_context(|| format!("Failed to create {}", config.data_dir.display()))?;

        Ok(Self::with_services(
            Arc::new(LocalStorage::new(&config.data_dir)),
            Arc::new(OpenLibrary::with_base_url(&config.catalog_url)),
            Arc::new(NytBestsellers::new(config.nyt_api_key.clone())),
        ))
    }

    /// Assemble state from explicit collaborators
    pub fn with_services(
        storage: Arc<dyn StorageProvider>,
        catalog: Arc<dyn Catalog>,
        bestsellers: Arc<dyn BestsellerFeed>,
    ) -> Self {
        let events = EventBus::new();
        let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);

        let tx = event_tx.clone();
        let bridge = events.subscribe(EventName::BooksUpdated, move |event| {
            // No SSE clients is not an error
            let _ = tx.send(event.clone());
        });

        Self {
            store: RecordStore::new(storage),
            events,
            catalog,
            bestsellers,
            event_tx,
            _bridge: Arc::new(bridge),
        }
    }

    /// Reading lists acting for one request's session
    pub fn lists_for(&self, session: StaticSession) -> ReadingLists {
        ReadingLists::new(self.store.clone(), Arc::new(session), self.events.clone())
    }

    /// Subscribe to list events from every user
    pub fn subscribe(&self) -> broadcast::Receiver<ListEvent> {
        self.event_tx.subscribe()
    }
}

use std::path::PathBuf;
use std::sync::Arc;

use crate::app::error::{MirrorError, Result};
use crate::client::http::HttpFeedClient;
use crate::client::FeedClient;
use crate::store::SqliteStore;
use crate::sync::parallel::{ParallelSyncer, DEFAULT_WORKERS};
use crate::sync::SyncEngine;

pub struct AppContext {
    pub store: Arc<SqliteStore>,
    pub engine: Arc<SyncEngine<SqliteStore>>,
    pub syncer: ParallelSyncer<SqliteStore>,
}

impl AppContext {
    pub fn new(db_path: Option<PathBuf>) -> Result<Self> {
        Self::with_workers(db_path, DEFAULT_WORKERS)
    }

    pub fn with_workers(db_path: Option<PathBuf>, workers: usize) -> Result<Self> {
        let db_path = match db_path {
            Some(p) => p,
            None => Self::default_db_path()?,
        };

        let store = Arc::new(SqliteStore::new(&db_path)?);
        let client: Arc<dyn FeedClient + Send + Sync> = Arc::new(HttpFeedClient::new());
        let engine = Arc::new(SyncEngine::new(client, store.clone()));
        let syncer = ParallelSyncer::with_workers(engine.clone(), workers);

        Ok(Self {
            store,
            engine,
            syncer,
        })
    }

    pub fn in_memory() -> Result<Self> {
        Self::in_memory_with_workers(DEFAULT_WORKERS)
    }

    pub fn in_memory_with_workers(workers: usize) -> Result<Self> {
        let store = Arc::new(SqliteStore::in_memory()?);
        let client: Arc<dyn FeedClient + Send + Sync> = Arc::new(HttpFeedClient::new());
        let engine = Arc::new(SyncEngine::new(client, store.clone()));
        let syncer = ParallelSyncer::with_workers(engine.clone(), workers);

        Ok(Self {
            store,
            engine,
            syncer,
        })
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| MirrorError::Config("Could not find data directory".into()))?;
        let mirror_dir = data_dir.join("feedmirror");
        std::fs::create_dir_all(&mirror_dir)?;
        Ok(mirror_dir.join("feedmirror.db"))
    }
}

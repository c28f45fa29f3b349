use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::app::Result;
use crate::domain::FeedSource;
use crate::store::Store;
use crate::sync::{SyncEngine, SyncOptions, SyncReport};

pub const DEFAULT_WORKERS: usize = 10;

/// Fan-out wrapper that syncs many sources concurrently with a bounded
/// number of in-flight fetches.
pub struct ParallelSyncer<S: Store> {
    engine: Arc<SyncEngine<S>>,
    semaphore: Arc<Semaphore>,
}

impl<S: Store + Send + Sync + 'static> ParallelSyncer<S> {
    pub fn new(engine: Arc<SyncEngine<S>>) -> Self {
        Self::with_workers(engine, DEFAULT_WORKERS)
    }

    pub fn with_workers(engine: Arc<SyncEngine<S>>, workers: usize) -> Self {
        Self {
            engine,
            semaphore: Arc::new(Semaphore::new(workers)),
        }
    }

    /// Sync every source, one task each, and pair each source name with
    /// its outcome. Sources must be distinct; the engine does not
    /// serialize concurrent cycles for the same source.
    pub async fn sync_all(
        &self,
        sources: Vec<FeedSource>,
        options: SyncOptions,
    ) -> Vec<(String, Result<SyncReport>)> {
        let mut handles = Vec::new();

        for source in sources {
            let engine = self.engine.clone();
            let semaphore = self.semaphore.clone();
            let options = options.clone();

            let handle = tokio::spawn(async move {
                let _permit = semaphore.acquire().await.expect("Semaphore closed");

                let result = engine.synchronize(&source, &options).await;
                (source.source_name, result)
            });

            handles.push(handle);
        }

        let mut results = Vec::new();
        for handle in handles {
            match handle.await {
                Ok(result) => results.push(result),
                Err(e) => {
                    tracing::error!("Task join error: {}", e);
                }
            }
        }

        results
    }
}

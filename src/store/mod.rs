pub mod sqlite;

use crate::app::Result;
use crate::domain::{Entry, FeedSource};

pub use sqlite::SqliteStore;

/// The full write-set of one sync cycle, applied as a single atomic unit.
///
/// `clear_existing` removes every entry of the source before the creates
/// are inserted (the force-reload path). `updates` carry the row ids of
/// the entries they overwrite; `creates` are inserted as new rows, so a
/// surviving slug or remote-id collision fails the whole batch.
#[derive(Debug, Default)]
pub struct SyncBatch {
    pub clear_existing: bool,
    pub creates: Vec<Entry>,
    pub updates: Vec<Entry>,
}

pub trait Store {
    // Source operations
    fn add_source(&self, source: &FeedSource) -> Result<i64>;
    fn get_source(&self, id: i64) -> Result<Option<FeedSource>>;
    fn get_source_by_name(&self, source_name: &str) -> Result<Option<FeedSource>>;
    fn get_all_sources(&self) -> Result<Vec<FeedSource>>;
    fn delete_source(&self, id: i64) -> Result<()>;

    // Entry operations
    fn get_entry_by_remote_id(&self, source_id: i64, remote_entry_id: &str)
        -> Result<Option<Entry>>;
    fn get_entries_by_source(&self, source_id: i64) -> Result<Vec<Entry>>;
    fn get_entry_by_slug(&self, slug: &str) -> Result<Option<Entry>>;
    fn count_entries(&self, source_id: i64) -> Result<i64>;
    /// Slug uniqueness probe. `exclude_source` ignores rows belonging to
    /// that source, for cycles that clear and rebuild their own entries.
    fn slug_exists(&self, slug: &str, exclude_source: Option<i64>) -> Result<bool>;

    // Sync commit
    fn commit_sync(&self, source: &FeedSource, batch: &SyncBatch) -> Result<()>;
}

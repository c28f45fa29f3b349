//! The synchronization engine: conditional fetch, merge and atomic commit.

pub mod parallel;

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use url::Url;

use crate::app::{MirrorError, Result};
use crate::atom;
use crate::client::{FeedClient, FetchOutcome};
use crate::domain::{Entry, FeedSource};
use crate::mapper;
use crate::slug;
use crate::store::{Store, SyncBatch};
use crate::summary::Summarizer;

/// The remote defaults to a small page size; ask for effectively everything.
pub const DEFAULT_MAX_RESULTS: u32 = 2000;

#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Discard all stored entries for the source and rebuild them from the
    /// fetched payload. The only way remote deletions become visible.
    pub force_reload: bool,
    /// Cap on the number of entries requested per fetch.
    pub max_results: u32,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            force_reload: false,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    /// The payload was fetched and merged.
    Merged,
    /// The freshness precondition matched; nothing was written.
    Unchanged,
}

/// Outcome summary of one sync cycle.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub source_url: String,
    pub status: SyncStatus,
}

impl SyncReport {
    fn unchanged(source_url: String) -> Self {
        Self {
            created: 0,
            updated: 0,
            deleted: 0,
            source_url,
            status: SyncStatus::Unchanged,
        }
    }
}

pub struct SyncEngine<S: Store> {
    client: Arc<dyn FeedClient + Send + Sync>,
    store: Arc<S>,
    summarizer: Summarizer,
}

impl<S: Store> SyncEngine<S> {
    pub fn new(client: Arc<dyn FeedClient + Send + Sync>, store: Arc<S>) -> Self {
        Self {
            client,
            store,
            summarizer: Summarizer::new(),
        }
    }

    /// Run one sync cycle for `source`.
    ///
    /// The cycle is all-or-nothing: every entry mutation, the refreshed
    /// feed metadata, the new etag and the sync timestamp are committed in
    /// one transaction, and any error before or during the commit leaves
    /// the store exactly as it was. Callers must not run two cycles for
    /// the same source concurrently.
    pub async fn synchronize(&self, source: &FeedSource, options: &SyncOptions) -> Result<SyncReport> {
        let source_id = source.id.ok_or_else(|| {
            MirrorError::Validation("cannot synchronize an unsaved feed source".into())
        })?;

        let source_url = build_fetch_url(source, options)?;
        let precondition = if options.force_reload {
            None
        } else {
            source.etag.as_deref()
        };

        let outcome = self
            .client
            .fetch(&source_url, precondition, source.credentials.as_ref())
            .await?;

        let (body, etag) = match outcome {
            FetchOutcome::NotModified => {
                tracing::debug!("Feed {} not modified", source_url);
                return Ok(SyncReport::unchanged(source_url));
            }
            FetchOutcome::Failed { status } => {
                return Err(MirrorError::Fetch { status });
            }
            FetchOutcome::Fetched { body, etag } => (body, etag),
        };

        let document = atom::parse(&body)?;

        let mut merged = source.clone();
        merged.apply(mapper::map_feed(&document.feed)?);
        merged.etag = etag;

        let deleted = if options.force_reload {
            self.store.count_entries(source_id)? as usize
        } else {
            0
        };

        let mut batch = SyncBatch {
            clear_existing: options.force_reload,
            ..SyncBatch::default()
        };
        // Slugs assigned earlier in this cycle are not yet visible in the
        // store, so track them on the side. When the cycle clears and
        // rebuilds, the source's own stored slugs are about to be freed
        // and must not count as collisions.
        let mut pending_slugs: HashSet<String> = HashSet::new();
        let exclude = options.force_reload.then_some(source_id);

        for raw_entry in &document.entries {
            let fields = mapper::map_entry(raw_entry, &self.summarizer)?;

            let existing = if options.force_reload {
                None
            } else {
                self.store
                    .get_entry_by_remote_id(source_id, &fields.remote_entry_id)?
            };

            match existing {
                Some(mut entry) => {
                    entry.apply(fields);
                    batch.updates.push(entry);
                }
                None => {
                    let slug = slug::generate(&fields.title, &fields.remote_entry_id, |candidate| {
                        Ok(pending_slugs.contains(candidate)
                            || self.store.slug_exists(candidate, exclude)?)
                    })?;
                    let entry = Entry::from_fields(source_id, fields, slug);
                    entry.validate()?;
                    pending_slugs.insert(entry.slug.clone());
                    batch.creates.push(entry);
                }
            }
        }

        merged.last_synced_at = Some(Utc::now());

        let created = batch.creates.len();
        let updated = batch.updates.len();
        self.store.commit_sync(&merged, &batch)?;

        tracing::info!(
            "Merged {}: {} created, {} updated, {} deleted",
            merged.source_name,
            created,
            updated,
            deleted
        );

        Ok(SyncReport {
            created,
            updated,
            deleted,
            source_url,
            status: SyncStatus::Merged,
        })
    }
}

/// Build the fetch URL: the source's syndication endpoint, capped by
/// `max-results`, and narrowed to entries updated since the last sync for
/// routine incremental refreshes.
fn build_fetch_url(source: &FeedSource, options: &SyncOptions) -> Result<String> {
    let mut url = Url::parse(&source.syndication_url())?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("max-results", &options.max_results.to_string());
        if let Some(last_synced_at) = source.last_synced_at {
            if !options.force_reload {
                // updated-min is ignored by the remote unless orderby is
                // set to updated.
                pairs.append_pair("orderby", "updated");
                pairs.append_pair(
                    "updated-min",
                    &last_synced_at.to_rfc3339_opts(SecondsFormat::Secs, true),
                );
            }
        }
    }
    Ok(url.into())
}

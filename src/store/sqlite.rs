use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use rusqlite_migration::{Migrations, M};

use crate::app::{MirrorError, Result};
use crate::domain::{Credentials, Entry, FeedSource};
use crate::store::{Store, SyncBatch};

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.conn()?;

        conn.execute("PRAGMA foreign_keys = ON", [])?;
        migrations
            .to_latest(&mut conn)
            .map_err(|_| MirrorError::Database(rusqlite::Error::InvalidQuery))?;

        Ok(())
    }

    /// Lock the connection. A poisoned lock is reported as a database
    /// failure rather than a panic.
    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            MirrorError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })
    }

    fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| s.parse::<DateTime<Utc>>().ok())
    }
}

impl Store for SqliteStore {
    fn add_source(&self, source: &FeedSource) -> Result<i64> {
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO feed_sources (source_name, remote_id, feed_id, title, self_link,
                                       alternate_link, atom_link, etag, username, password,
                                       last_synced_at, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                source.source_name,
                source.remote_id,
                source.feed_id,
                source.title,
                source.self_link,
                source.alternate_link,
                source.atom_link,
                source.etag,
                source.credentials.as_ref().map(|c| c.username.as_str()),
                source.credentials.as_ref().map(|c| c.password.as_str()),
                source.last_synced_at.map(|dt| dt.to_rfc3339()),
                source.created_at.to_rfc3339()
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    fn get_source(&self, id: i64) -> Result<Option<FeedSource>> {
        let conn = self.conn()?;

        let result = conn
            .query_row(
                "SELECT id, source_name, remote_id, feed_id, title, self_link, alternate_link,
                        atom_link, etag, username, password, last_synced_at, created_at
                 FROM feed_sources WHERE id = ?1",
                params![id],
                |row| {
                    Ok(FeedSource {
                        id: row.get(0)?,
                        source_name: row.get(1)?,
                        remote_id: row.get(2)?,
                        feed_id: row.get(3)?,
                        title: row.get(4)?,
                        self_link: row.get(5)?,
                        alternate_link: row.get(6)?,
                        atom_link: row.get(7)?,
                        etag: row.get(8)?,
                        credentials: credentials_from_columns(
                            row.get(9)?,
                            row.get(10)?,
                        ),
                        last_synced_at: row
                            .get::<_, Option<String>>(11)?
                            .and_then(|s| Self::parse_datetime(&s)),
                        created_at: row
                            .get::<_, String>(12)
                            .ok()
                            .and_then(|s| Self::parse_datetime(&s))
                            .unwrap_or_else(Utc::now),
                    })
                },
            )
            .optional()?;

        Ok(result)
    }

    fn get_source_by_name(&self, source_name: &str) -> Result<Option<FeedSource>> {
        let conn = self.conn()?;

        let result = conn
            .query_row(
                "SELECT id, source_name, remote_id, feed_id, title, self_link, alternate_link,
                        atom_link, etag, username, password, last_synced_at, created_at
                 FROM feed_sources WHERE source_name = ?1",
                params![source_name],
                |row| {
                    Ok(FeedSource {
                        id: row.get(0)?,
                        source_name: row.get(1)?,
                        remote_id: row.get(2)?,
                        feed_id: row.get(3)?,
                        title: row.get(4)?,
                        self_link: row.get(5)?,
                        alternate_link: row.get(6)?,
                        atom_link: row.get(7)?,
                        etag: row.get(8)?,
                        credentials: credentials_from_columns(
                            row.get(9)?,
                            row.get(10)?,
                        ),
                        last_synced_at: row
                            .get::<_, Option<String>>(11)?
                            .and_then(|s| Self::parse_datetime(&s)),
                        created_at: row
                            .get::<_, String>(12)
                            .ok()
                            .and_then(|s| Self::parse_datetime(&s))
                            .unwrap_or_else(Utc::now),
                    })
                },
            )
            .optional()?;

        Ok(result)
    }

    fn get_all_sources(&self) -> Result<Vec<FeedSource>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            "SELECT id, source_name, remote_id, feed_id, title, self_link, alternate_link,
                    atom_link, etag, username, password, last_synced_at, created_at
             FROM feed_sources ORDER BY source_name",
        )?;

        let sources = stmt
            .query_map([], |row| {
                Ok(FeedSource {
                    id: row.get(0)?,
                    source_name: row.get(1)?,
                    remote_id: row.get(2)?,
                    feed_id: row.get(3)?,
                    title: row.get(4)?,
                    self_link: row.get(5)?,
                    alternate_link: row.get(6)?,
                    atom_link: row.get(7)?,
                    etag: row.get(8)?,
                    credentials: credentials_from_columns(row.get(9)?, row.get(10)?),
                    last_synced_at: row
                        .get::<_, Option<String>>(11)?
                        .and_then(|s| Self::parse_datetime(&s)),
                    created_at: row
                        .get::<_, String>(12)
                        .ok()
                        .and_then(|s| Self::parse_datetime(&s))
                        .unwrap_or_else(Utc::now),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(sources)
    }

    fn delete_source(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;

        conn.execute("DELETE FROM feed_sources WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn get_entry_by_remote_id(
        &self,
        source_id: i64,
        remote_entry_id: &str,
    ) -> Result<Option<Entry>> {
        let conn = self.conn()?;

        let result = conn
            .query_row(
                "SELECT id, source_id, remote_entry_id, title, content, summary, slug,
                        published_at, updated_at, self_link, alternate_link, etag
                 FROM entries WHERE source_id = ?1 AND remote_entry_id = ?2",
                params![source_id, remote_entry_id],
                |row| {
                    Ok(Entry {
                        id: row.get(0)?,
                        source_id: row.get(1)?,
                        remote_entry_id: row.get(2)?,
                        title: row.get(3)?,
                        content: row.get(4)?,
                        summary: row.get(5)?,
                        slug: row.get(6)?,
                        published_at: row
                            .get::<_, String>(7)
                            .ok()
                            .and_then(|s| Self::parse_datetime(&s))
                            .unwrap_or_else(Utc::now),
                        updated_at: row
                            .get::<_, String>(8)
                            .ok()
                            .and_then(|s| Self::parse_datetime(&s))
                            .unwrap_or_else(Utc::now),
                        self_link: row.get(9)?,
                        alternate_link: row.get(10)?,
                        etag: row.get(11)?,
                    })
                },
            )
            .optional()?;

        Ok(result)
    }

    fn get_entries_by_source(&self, source_id: i64) -> Result<Vec<Entry>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            "SELECT id, source_id, remote_entry_id, title, content, summary, slug,
                    published_at, updated_at, self_link, alternate_link, etag
             FROM entries WHERE source_id = ?1 ORDER BY published_at DESC",
        )?;

        let entries = stmt
            .query_map(params![source_id], |row| {
                Ok(Entry {
                    id: row.get(0)?,
                    source_id: row.get(1)?,
                    remote_entry_id: row.get(2)?,
                    title: row.get(3)?,
                    content: row.get(4)?,
                    summary: row.get(5)?,
                    slug: row.get(6)?,
                    published_at: row
                        .get::<_, String>(7)
                        .ok()
                        .and_then(|s| Self::parse_datetime(&s))
                        .unwrap_or_else(Utc::now),
                    updated_at: row
                        .get::<_, String>(8)
                        .ok()
                        .and_then(|s| Self::parse_datetime(&s))
                        .unwrap_or_else(Utc::now),
                    self_link: row.get(9)?,
                    alternate_link: row.get(10)?,
                    etag: row.get(11)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    fn get_entry_by_slug(&self, slug: &str) -> Result<Option<Entry>> {
        let conn = self.conn()?;

        let result = conn
            .query_row(
                "SELECT id, source_id, remote_entry_id, title, content, summary, slug,
                        published_at, updated_at, self_link, alternate_link, etag
                 FROM entries WHERE slug = ?1",
                params![slug],
                |row| {
                    Ok(Entry {
                        id: row.get(0)?,
                        source_id: row.get(1)?,
                        remote_entry_id: row.get(2)?,
                        title: row.get(3)?,
                        content: row.get(4)?,
                        summary: row.get(5)?,
                        slug: row.get(6)?,
                        published_at: row
                            .get::<_, String>(7)
                            .ok()
                            .and_then(|s| Self::parse_datetime(&s))
                            .unwrap_or_else(Utc::now),
                        updated_at: row
                            .get::<_, String>(8)
                            .ok()
                            .and_then(|s| Self::parse_datetime(&s))
                            .unwrap_or_else(Utc::now),
                        self_link: row.get(9)?,
                        alternate_link: row.get(10)?,
                        etag: row.get(11)?,
                    })
                },
            )
            .optional()?;

        Ok(result)
    }

    fn count_entries(&self, source_id: i64) -> Result<i64> {
        let conn = self.conn()?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM entries WHERE source_id = ?1",
            params![source_id],
            |row| row.get(0),
        )?;

        Ok(count)
    }

    fn slug_exists(&self, slug: &str, exclude_source: Option<i64>) -> Result<bool> {
        let conn = self.conn()?;

        let count: i64 = match exclude_source {
            Some(source_id) => conn.query_row(
                "SELECT COUNT(*) FROM entries WHERE slug = ?1 AND source_id != ?2",
                params![slug, source_id],
                |row| row.get(0),
            )?,
            None => conn.query_row(
                "SELECT COUNT(*) FROM entries WHERE slug = ?1",
                params![slug],
                |row| row.get(0),
            )?,
        };

        Ok(count > 0)
    }

    fn commit_sync(&self, source: &FeedSource, batch: &SyncBatch) -> Result<()> {
        let source_id = source.id.ok_or_else(|| {
            MirrorError::Validation("cannot commit a sync for an unsaved feed source".into())
        })?;

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            "UPDATE feed_sources
             SET feed_id = ?1, title = ?2, self_link = ?3, alternate_link = ?4,
                 atom_link = ?5, etag = ?6, last_synced_at = ?7
             WHERE id = ?8",
            params![
                source.feed_id,
                source.title,
                source.self_link,
                source.alternate_link,
                source.atom_link,
                source.etag,
                source.last_synced_at.map(|dt| dt.to_rfc3339()),
                source_id
            ],
        )?;

        if batch.clear_existing {
            tx.execute(
                "DELETE FROM entries WHERE source_id = ?1",
                params![source_id],
            )?;
        }

        for entry in &batch.updates {
            tx.execute(
                "UPDATE entries
                 SET title = ?1, content = ?2, summary = ?3, published_at = ?4,
                     updated_at = ?5, self_link = ?6, alternate_link = ?7, etag = ?8
                 WHERE id = ?9",
                params![
                    entry.title,
                    entry.content,
                    entry.summary,
                    entry.published_at.to_rfc3339(),
                    entry.updated_at.to_rfc3339(),
                    entry.self_link,
                    entry.alternate_link,
                    entry.etag,
                    entry.id
                ],
            )?;
        }

        // Plain INSERT: a slug or remote-id collision must fail the whole
        // transaction, not be silently ignored.
        for entry in &batch.creates {
            tx.execute(
                "INSERT INTO entries (source_id, remote_entry_id, title, content, summary, slug,
                                      published_at, updated_at, self_link, alternate_link, etag)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    source_id,
                    entry.remote_entry_id,
                    entry.title,
                    entry.content,
                    entry.summary,
                    entry.slug,
                    entry.published_at.to_rfc3339(),
                    entry.updated_at.to_rfc3339(),
                    entry.self_link,
                    entry.alternate_link,
                    entry.etag
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }
}

fn credentials_from_columns(
    username: Option<String>,
    password: Option<String>,
) -> Option<Credentials> {
    match (username, password) {
        (Some(username), Some(password)) => Some(Credentials { username, password }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_source(name: &str, remote_id: &str) -> FeedSource {
        FeedSource::new(name.to_string(), remote_id.to_string())
    }

    fn sample_entry(source_id: i64, remote_entry_id: &str, slug: &str) -> Entry {
        Entry {
            id: None,
            source_id,
            remote_entry_id: remote_entry_id.to_string(),
            title: "A Post".into(),
            content: "<p>body</p>".into(),
            summary: "body".into(),
            slug: slug.to_string(),
            published_at: Utc::now(),
            updated_at: Utc::now(),
            self_link: None,
            alternate_link: None,
            etag: Some("W/\"e\"".into()),
        }
    }

    #[test]
    fn test_add_and_get_source() {
        let store = SqliteStore::in_memory().unwrap();
        let source = sample_source("teixo", "8729");
        let id = store.add_source(&source).unwrap();

        let retrieved = store.get_source(id).unwrap().unwrap();
        assert_eq!(retrieved.source_name, "teixo");
        assert_eq!(retrieved.remote_id, "8729");
        assert_eq!(retrieved.etag, None);
        assert_eq!(retrieved.last_synced_at, None);
    }

    #[test]
    fn test_get_source_by_name() {
        let store = SqliteStore::in_memory().unwrap();
        store.add_source(&sample_source("teixo", "8729")).unwrap();

        let found = store.get_source_by_name("teixo").unwrap();
        assert!(found.is_some());

        let missing = store.get_source_by_name("nonexistent").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_source_name_is_unique() {
        let store = SqliteStore::in_memory().unwrap();
        store.add_source(&sample_source("teixo", "8729")).unwrap();

        let duplicate = store.add_source(&sample_source("teixo", "other"));
        assert!(duplicate.is_err());
    }

    #[test]
    fn test_remote_id_is_unique() {
        let store = SqliteStore::in_memory().unwrap();
        store.add_source(&sample_source("teixo", "8729")).unwrap();

        let duplicate = store.add_source(&sample_source("other", "8729"));
        assert!(duplicate.is_err());
    }

    #[test]
    fn test_credentials_round_trip() {
        let store = SqliteStore::in_memory().unwrap();
        let mut source = sample_source("private", "111");
        source.credentials = Some(Credentials {
            username: "reader@example.com".into(),
            password: "hunter2".into(),
        });
        let id = store.add_source(&source).unwrap();

        let retrieved = store.get_source(id).unwrap().unwrap();
        let creds = retrieved.credentials.unwrap();
        assert_eq!(creds.username, "reader@example.com");
        assert_eq!(creds.password, "hunter2");
    }

    #[test]
    fn test_get_all_sources_ordered_by_name() {
        let store = SqliteStore::in_memory().unwrap();
        store.add_source(&sample_source("cherry", "3")).unwrap();
        store.add_source(&sample_source("apple", "1")).unwrap();
        store.add_source(&sample_source("banana", "2")).unwrap();

        let sources = store.get_all_sources().unwrap();
        let names: Vec<&str> = sources.iter().map(|s| s.source_name.as_str()).collect();
        assert_eq!(names, vec!["apple", "banana", "cherry"]);
    }

    #[test]
    fn test_commit_sync_creates_entries() {
        let store = SqliteStore::in_memory().unwrap();
        let mut source = sample_source("teixo", "8729");
        let id = store.add_source(&source).unwrap();
        source.id = Some(id);
        source.title = Some("Example Blog".into());
        source.etag = Some("E2".into());
        source.last_synced_at = Some(Utc::now());

        let batch = SyncBatch {
            clear_existing: false,
            creates: vec![
                sample_entry(id, "post-1", "first-post"),
                sample_entry(id, "post-2", "second-post"),
            ],
            updates: vec![],
        };
        store.commit_sync(&source, &batch).unwrap();

        assert_eq!(store.count_entries(id).unwrap(), 2);
        let refreshed = store.get_source(id).unwrap().unwrap();
        assert_eq!(refreshed.title, Some("Example Blog".into()));
        assert_eq!(refreshed.etag, Some("E2".into()));
        assert!(refreshed.last_synced_at.is_some());
    }

    #[test]
    fn test_commit_sync_updates_in_place() {
        let store = SqliteStore::in_memory().unwrap();
        let mut source = sample_source("teixo", "8729");
        let id = store.add_source(&source).unwrap();
        source.id = Some(id);

        let batch = SyncBatch {
            clear_existing: false,
            creates: vec![sample_entry(id, "post-1", "first-post")],
            updates: vec![],
        };
        store.commit_sync(&source, &batch).unwrap();

        let mut stored = store.get_entry_by_remote_id(id, "post-1").unwrap().unwrap();
        stored.title = "Renamed".into();
        stored.content = "<p>edited</p>".into();

        let batch = SyncBatch {
            clear_existing: false,
            creates: vec![],
            updates: vec![stored],
        };
        store.commit_sync(&source, &batch).unwrap();

        let refreshed = store.get_entry_by_remote_id(id, "post-1").unwrap().unwrap();
        assert_eq!(refreshed.title, "Renamed");
        assert_eq!(refreshed.content, "<p>edited</p>");
        assert_eq!(refreshed.slug, "first-post");
        assert_eq!(store.count_entries(id).unwrap(), 1);
    }

    #[test]
    fn test_commit_sync_clear_existing_replaces_entries() {
        let store = SqliteStore::in_memory().unwrap();
        let mut source = sample_source("teixo", "8729");
        let id = store.add_source(&source).unwrap();
        source.id = Some(id);

        let batch = SyncBatch {
            clear_existing: false,
            creates: vec![
                sample_entry(id, "post-1", "first-post"),
                sample_entry(id, "post-2", "second-post"),
            ],
            updates: vec![],
        };
        store.commit_sync(&source, &batch).unwrap();

        // Rebuild from scratch; the old slugs must be reusable.
        let batch = SyncBatch {
            clear_existing: true,
            creates: vec![sample_entry(id, "post-2", "second-post")],
            updates: vec![],
        };
        store.commit_sync(&source, &batch).unwrap();

        assert_eq!(store.count_entries(id).unwrap(), 1);
        assert!(store.get_entry_by_remote_id(id, "post-1").unwrap().is_none());
        assert!(store.get_entry_by_remote_id(id, "post-2").unwrap().is_some());
    }

    #[test]
    fn test_commit_sync_rolls_back_on_slug_collision() {
        let store = SqliteStore::in_memory().unwrap();

        let mut first = sample_source("first", "1");
        let first_id = store.add_source(&first).unwrap();
        first.id = Some(first_id);
        let batch = SyncBatch {
            clear_existing: false,
            creates: vec![sample_entry(first_id, "post-1", "hello-world")],
            updates: vec![],
        };
        store.commit_sync(&first, &batch).unwrap();

        let mut second = sample_source("second", "2");
        let second_id = store.add_source(&second).unwrap();
        second.id = Some(second_id);
        second.etag = Some("E9".into());
        let batch = SyncBatch {
            clear_existing: false,
            creates: vec![
                sample_entry(second_id, "post-a", "unique-enough"),
                sample_entry(second_id, "post-b", "hello-world"),
            ],
            updates: vec![],
        };
        assert!(store.commit_sync(&second, &batch).is_err());

        // Nothing of the failed cycle may remain, including the etag.
        assert_eq!(store.count_entries(second_id).unwrap(), 0);
        let refreshed = store.get_source(second_id).unwrap().unwrap();
        assert_eq!(refreshed.etag, None);
    }

    #[test]
    fn test_commit_sync_rejects_duplicate_remote_id_in_batch() {
        let store = SqliteStore::in_memory().unwrap();
        let mut source = sample_source("teixo", "8729");
        let id = store.add_source(&source).unwrap();
        source.id = Some(id);

        let batch = SyncBatch {
            clear_existing: false,
            creates: vec![
                sample_entry(id, "post-1", "one"),
                sample_entry(id, "post-1", "two"),
            ],
            updates: vec![],
        };
        assert!(store.commit_sync(&source, &batch).is_err());
        assert_eq!(store.count_entries(id).unwrap(), 0);
    }

    #[test]
    fn test_slug_exists() {
        let store = SqliteStore::in_memory().unwrap();
        let mut source = sample_source("teixo", "8729");
        let id = store.add_source(&source).unwrap();
        source.id = Some(id);

        let batch = SyncBatch {
            clear_existing: false,
            creates: vec![sample_entry(id, "post-1", "hello-world")],
            updates: vec![],
        };
        store.commit_sync(&source, &batch).unwrap();

        assert!(store.slug_exists("hello-world", None).unwrap());
        assert!(!store.slug_exists("goodbye-world", None).unwrap());
    }

    #[test]
    fn test_slug_exists_can_exclude_own_source() {
        let store = SqliteStore::in_memory().unwrap();
        let mut source = sample_source("teixo", "8729");
        let id = store.add_source(&source).unwrap();
        source.id = Some(id);

        let batch = SyncBatch {
            clear_existing: false,
            creates: vec![sample_entry(id, "post-1", "hello-world")],
            updates: vec![],
        };
        store.commit_sync(&source, &batch).unwrap();

        assert!(!store.slug_exists("hello-world", Some(id)).unwrap());
        assert!(store.slug_exists("hello-world", Some(id + 1)).unwrap());
    }

    #[test]
    fn test_delete_source_cascades_entries() {
        let store = SqliteStore::in_memory().unwrap();
        let mut source = sample_source("teixo", "8729");
        let id = store.add_source(&source).unwrap();
        source.id = Some(id);

        let batch = SyncBatch {
            clear_existing: false,
            creates: vec![sample_entry(id, "post-1", "hello-world")],
            updates: vec![],
        };
        store.commit_sync(&source, &batch).unwrap();

        store.delete_source(id).unwrap();

        assert!(store.get_source(id).unwrap().is_none());
        assert!(!store.slug_exists("hello-world", None).unwrap());
    }

    #[test]
    fn test_get_entries_by_source_newest_first() {
        let store = SqliteStore::in_memory().unwrap();
        let mut source = sample_source("teixo", "8729");
        let id = store.add_source(&source).unwrap();
        source.id = Some(id);

        let mut older = sample_entry(id, "post-1", "older");
        older.published_at = "2010-08-30T08:20:00Z".parse().unwrap();
        let mut newer = sample_entry(id, "post-2", "newer");
        newer.published_at = "2010-09-01T10:00:00Z".parse().unwrap();

        let batch = SyncBatch {
            clear_existing: false,
            creates: vec![older, newer],
            updates: vec![],
        };
        store.commit_sync(&source, &batch).unwrap();

        let entries = store.get_entries_by_source(id).unwrap();
        assert_eq!(entries[0].slug, "newer");
        assert_eq!(entries[1].slug, "older");
    }

    #[test]
    fn test_get_entry_by_slug() {
        let store = SqliteStore::in_memory().unwrap();
        let mut source = sample_source("teixo", "8729");
        let id = store.add_source(&source).unwrap();
        source.id = Some(id);

        let batch = SyncBatch {
            clear_existing: false,
            creates: vec![sample_entry(id, "post-1", "hello-world")],
            updates: vec![],
        };
        store.commit_sync(&source, &batch).unwrap();

        let found = store.get_entry_by_slug("hello-world").unwrap().unwrap();
        assert_eq!(found.remote_entry_id, "post-1");
        assert!(store.get_entry_by_slug("nope").unwrap().is_none());
    }

    #[test]
    fn test_on_disk_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mirror.db");

        {
            let store = SqliteStore::new(&path).unwrap();
            store.add_source(&sample_source("teixo", "8729")).unwrap();
        }

        let store = SqliteStore::new(&path).unwrap();
        let source = store.get_source_by_name("teixo").unwrap();
        assert!(source.is_some());
    }

    #[test]
    fn test_get_source_nonexistent() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(store.get_source(999).unwrap().is_none());
    }
}

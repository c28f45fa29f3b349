use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Credentials for feeds that require HTTP basic auth.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// A remote feed registered for mirroring.
///
/// `remote_id` identifies the blog on the remote host and determines the
/// syndication URL. The metadata fields (`feed_id`, `title`, the link
/// triple) are populated from the feed document on first sync and
/// refreshed on every successful sync after that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedSource {
    pub id: Option<i64>,
    pub source_name: String,
    pub remote_id: String,
    pub feed_id: Option<String>,
    pub title: Option<String>,
    pub self_link: Option<String>,
    pub alternate_link: Option<String>,
    pub atom_link: Option<String>,
    pub etag: Option<String>,
    pub credentials: Option<Credentials>,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Feed-level metadata captured from a fetched document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSourceFields {
    pub feed_id: String,
    pub title: String,
    pub self_link: Option<String>,
    pub alternate_link: Option<String>,
    pub atom_link: Option<String>,
}

impl FeedSource {
    pub fn new(source_name: String, remote_id: String) -> Self {
        FeedSource {
            id: None,
            source_name,
            remote_id,
            feed_id: None,
            title: None,
            self_link: None,
            alternate_link: None,
            atom_link: None,
            etag: None,
            credentials: None,
            last_synced_at: None,
            created_at: Utc::now(),
        }
    }

    /// The syndication endpoint for this source's remote id.
    pub fn syndication_url(&self) -> String {
        format!(
            "https://www.blogger.com/feeds/{}/posts/default",
            self.remote_id
        )
    }

    /// Preferred feed URL: the advertised atom link when the feed has
    /// been fetched at least once, the syndication endpoint otherwise.
    pub fn feed_url(&self) -> String {
        match &self.atom_link {
            Some(href) => href.clone(),
            None => self.syndication_url(),
        }
    }

    /// Human-facing link to the mirrored site, if the feed advertised one.
    pub fn link(&self) -> Option<&str> {
        self.alternate_link.as_deref()
    }

    pub fn display_title(&self) -> &str {
        match &self.title {
            Some(title) if !title.is_empty() => title,
            _ => &self.source_name,
        }
    }

    /// Overwrite feed-level metadata with fields from a fresh document.
    pub fn apply(&mut self, fields: FeedSourceFields) {
        self.feed_id = Some(fields.feed_id);
        self.title = Some(fields.title);
        self.self_link = fields.self_link;
        self.alternate_link = fields.alternate_link;
        self.atom_link = fields.atom_link;
    }
}

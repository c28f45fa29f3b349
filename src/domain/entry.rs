use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::app::error::{MirrorError, Result};

/// Column limit on `slug`; mirrored by the schema.
pub const MAX_SLUG_LEN: usize = 250;

static RE_POST_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.post-(\d+)").unwrap());
static RE_IMG_SRC_DQ: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)src\s*=\s*"([^"]+)""#).unwrap());
static RE_IMG_SRC_SQ: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)src\s*=\s*'([^']+)'").unwrap());

/// Hosted feeds inject a tracking pixel as the first image of every post.
const TRACKER_PREFIX: &str = "https://blogger.googleusercontent.com/tracker";

/// One mirrored post, owned by exactly one [`FeedSource`](super::FeedSource).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub id: Option<i64>,
    pub source_id: i64,
    pub remote_entry_id: String,
    pub title: String,
    pub content: String,
    pub summary: String,
    pub slug: String,
    pub published_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub self_link: Option<String>,
    pub alternate_link: Option<String>,
    pub etag: Option<String>,
}

/// Entry-level fields captured from a fetched document. Everything an
/// update may overwrite; the slug is deliberately absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFields {
    pub remote_entry_id: String,
    pub title: String,
    pub etag: Option<String>,
    pub content: String,
    pub summary: String,
    pub published_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub self_link: Option<String>,
    pub alternate_link: Option<String>,
}

impl Entry {
    pub fn from_fields(source_id: i64, fields: EntryFields, slug: String) -> Self {
        Entry {
            id: None,
            source_id,
            remote_entry_id: fields.remote_entry_id,
            title: fields.title,
            content: fields.content,
            summary: fields.summary,
            slug,
            published_at: fields.published_at,
            updated_at: fields.updated_at,
            self_link: fields.self_link,
            alternate_link: fields.alternate_link,
            etag: fields.etag,
        }
    }

    /// Overwrite the mutable fields with a freshly mapped record. The slug
    /// is assigned once at creation and never recomputed.
    pub fn apply(&mut self, fields: EntryFields) {
        self.remote_entry_id = fields.remote_entry_id;
        self.title = fields.title;
        self.content = fields.content;
        self.summary = fields.summary;
        self.published_at = fields.published_at;
        self.updated_at = fields.updated_at;
        self.self_link = fields.self_link;
        self.alternate_link = fields.alternate_link;
        self.etag = fields.etag;
    }

    /// Check the structural slug invariants: non-empty, `[a-z0-9-]` only,
    /// at most [`MAX_SLUG_LEN`] characters.
    pub fn validate(&self) -> Result<()> {
        if self.slug.is_empty() {
            return Err(MirrorError::Validation(format!(
                "entry '{}' produced an empty slug",
                self.remote_entry_id
            )));
        }
        if !self
            .slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(MirrorError::Validation(format!(
                "slug '{}' must contain only lowercase letters, digits and '-'",
                self.slug
            )));
        }
        if self.slug.len() > MAX_SLUG_LEN {
            return Err(MirrorError::Validation(format!(
                "slug '{}' exceeds {} characters",
                self.slug, MAX_SLUG_LEN
            )));
        }
        Ok(())
    }

    /// Link to the post on the remote host.
    pub fn link(&self) -> Option<&str> {
        self.alternate_link.as_deref()
    }

    /// Numeric post identifier embedded in the remote entry id, e.g.
    /// `tag:blogger.com,1999:blog-8729.post-7054` yields `7054`.
    pub fn remote_post_id(&self) -> Option<&str> {
        RE_POST_ID
            .captures(&self.remote_entry_id)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }

    /// First usable image URL in the content, for thumbnail display.
    /// Scans `src="..."` then `src='...'` attributes and skips the
    /// tracking pixel the hosting service prepends to the body.
    pub fn thumbnail_src(&self) -> Option<&str> {
        RE_IMG_SRC_DQ
            .captures_iter(&self.content)
            .chain(RE_IMG_SRC_SQ.captures_iter(&self.content))
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str())
            .find(|src| !src.starts_with(TRACKER_PREFIX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_with_slug(slug: &str) -> Entry {
        let fields = EntryFields {
            remote_entry_id: "tag:blogger.com,1999:blog-8729.post-7054".into(),
            title: "A Post".into(),
            etag: Some("W/\"abc\"".into()),
            content: String::new(),
            summary: String::new(),
            published_at: Utc::now(),
            updated_at: Utc::now(),
            self_link: None,
            alternate_link: None,
        };
        Entry::from_fields(1, fields, slug.to_string())
    }

    #[test]
    fn test_validate_accepts_clean_slug() {
        assert!(entry_with_slug("my-1st-valid-id").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_slug() {
        assert!(entry_with_slug("").validate().is_err());
    }

    #[test]
    fn test_validate_rejects_uppercase() {
        assert!(entry_with_slug("Not-Valid").validate().is_err());
    }

    #[test]
    fn test_validate_rejects_overlong_slug() {
        let slug = "a".repeat(MAX_SLUG_LEN + 1);
        assert!(entry_with_slug(&slug).validate().is_err());
        let slug = "a".repeat(MAX_SLUG_LEN);
        assert!(entry_with_slug(&slug).validate().is_ok());
    }

    #[test]
    fn test_apply_leaves_slug_untouched() {
        let mut entry = entry_with_slug("original-slug");
        let fields = EntryFields {
            remote_entry_id: entry.remote_entry_id.clone(),
            title: "Renamed Post".into(),
            etag: Some("W/\"def\"".into()),
            content: "<p>new body</p>".into(),
            summary: "new body".into(),
            published_at: entry.published_at,
            updated_at: Utc::now(),
            self_link: Some("https://example.com/self".into()),
            alternate_link: Some("https://example.com/post".into()),
        };
        entry.apply(fields);
        assert_eq!(entry.slug, "original-slug");
        assert_eq!(entry.title, "Renamed Post");
        assert_eq!(entry.link(), Some("https://example.com/post"));
    }

    #[test]
    fn test_remote_post_id_extracts_digits() {
        let entry = entry_with_slug("x");
        assert_eq!(entry.remote_post_id(), Some("7054"));
    }

    #[test]
    fn test_remote_post_id_none_without_marker() {
        let mut entry = entry_with_slug("x");
        entry.remote_entry_id = "urn:uuid:1234".into();
        assert_eq!(entry.remote_post_id(), None);
    }

    #[test]
    fn test_thumbnail_src_skips_tracker() {
        let mut entry = entry_with_slug("x");
        entry.content = format!(
            "<img src=\"{}/abc\" /><p>text</p><img src='https://example.com/photo.png' />",
            TRACKER_PREFIX
        );
        assert_eq!(entry.thumbnail_src(), Some("https://example.com/photo.png"));
    }

    #[test]
    fn test_thumbnail_src_none_without_images() {
        let mut entry = entry_with_slug("x");
        entry.content = "<p>no pictures here</p>".into();
        assert_eq!(entry.thumbnail_src(), None);
    }
}

//! Typed mappers from parsed Atom records to domain field sets.

use chrono::{DateTime, Utc};

use crate::app::error::{MirrorError, Result};
use crate::atom::{AtomEntry, AtomFeed, AtomLink};
use crate::domain::{EntryFields, FeedSourceFields};
use crate::summary::Summarizer;

/// Map feed-level metadata. The `id` and `title` elements are mandatory;
/// links are scanned in document order and, should the same logical slot
/// match twice, the later link wins.
pub fn map_feed(feed: &AtomFeed) -> Result<FeedSourceFields> {
    let feed_id = feed
        .id
        .clone()
        .ok_or_else(|| MirrorError::Mapping("feed is missing its <id> element".into()))?;
    let title = feed
        .title
        .clone()
        .ok_or_else(|| MirrorError::Mapping("feed is missing its <title> element".into()))?;

    let mut fields = FeedSourceFields {
        feed_id,
        title,
        self_link: None,
        alternate_link: None,
        atom_link: None,
    };
    for link in &feed.links {
        let Some(href) = link.href.as_deref() else {
            continue;
        };
        if link.rel.as_deref() == Some("self") {
            fields.self_link = Some(href.to_string());
        }
        if is_html_alternate(link) {
            fields.alternate_link = Some(href.to_string());
        }
        if link.kind.as_deref() == Some("application/atom+xml") {
            fields.atom_link = Some(href.to_string());
        }
    }
    Ok(fields)
}

/// Map one entry record. `id`, `title`, `published` and `updated` are
/// mandatory. When the entry carries no explicit summary, one is derived
/// from the content; when it carries no content, the summary text stands
/// in for it.
pub fn map_entry(entry: &AtomEntry, summarizer: &Summarizer) -> Result<EntryFields> {
    let remote_entry_id = entry
        .id
        .clone()
        .ok_or_else(|| MirrorError::Mapping("entry is missing its <id> element".into()))?;
    let title = entry.title.clone().ok_or_else(|| {
        MirrorError::Mapping(format!("entry '{remote_entry_id}' is missing its <title> element"))
    })?;
    let published_at = parse_timestamp(entry.published.as_deref(), "published", &remote_entry_id)?;
    let updated_at = parse_timestamp(entry.updated.as_deref(), "updated", &remote_entry_id)?;

    let content = entry
        .content
        .clone()
        .or_else(|| entry.summary.clone())
        .unwrap_or_default();
    let summary = match &entry.summary {
        Some(summary) => summary.clone(),
        None => summarizer.summarize(&content),
    };

    let mut self_link = None;
    let mut alternate_link = None;
    for link in &entry.links {
        let Some(href) = link.href.as_deref() else {
            continue;
        };
        if link.rel.as_deref() == Some("self") {
            self_link = Some(href.to_string());
        }
        if is_html_alternate(link) {
            alternate_link = Some(href.to_string());
        }
    }

    Ok(EntryFields {
        remote_entry_id,
        title,
        etag: entry.etag.clone(),
        content,
        summary,
        published_at,
        updated_at,
        self_link,
        alternate_link,
    })
}

fn is_html_alternate(link: &AtomLink) -> bool {
    link.rel.as_deref() == Some("alternate") && link.kind.as_deref() == Some("text/html")
}

fn parse_timestamp(value: Option<&str>, element: &str, entry_id: &str) -> Result<DateTime<Utc>> {
    let raw = value.ok_or_else(|| {
        MirrorError::Mapping(format!("entry '{entry_id}' is missing its <{element}> element"))
    })?;
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            MirrorError::Mapping(format!(
                "entry '{entry_id}' has an unparsable <{element}> timestamp '{raw}': {e}"
            ))
        })
}

//! Reader for the Atom document shape served by the blog feed API.
//!
//! Only the elements the merge pipeline consumes are modeled: feed-level
//! `id`, `title` and `link`, and entry-level `id`, `title`, `content`,
//! `summary`, `published`, `updated`, `link` and the per-entry `gd:etag`
//! attribute. General-purpose feed parsing is out of scope.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::app::error::{MirrorError, Result};

#[derive(Debug, Clone, Default)]
pub struct AtomFeed {
    pub id: Option<String>,
    pub title: Option<String>,
    pub links: Vec<AtomLink>,
}

#[derive(Debug, Clone, Default)]
pub struct AtomEntry {
    pub id: Option<String>,
    pub title: Option<String>,
    pub etag: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub published: Option<String>,
    pub updated: Option<String>,
    pub links: Vec<AtomLink>,
}

#[derive(Debug, Clone, Default)]
pub struct AtomLink {
    pub rel: Option<String>,
    pub kind: Option<String>,
    pub href: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AtomDocument {
    pub feed: AtomFeed,
    pub entries: Vec<AtomEntry>,
}

/// Simple text-bearing elements captured into fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextField {
    Id,
    Title,
    Content,
    Summary,
    Published,
    Updated,
}

fn text_field(name: &[u8]) -> Option<TextField> {
    match name {
        b"id" => Some(TextField::Id),
        b"title" => Some(TextField::Title),
        b"content" => Some(TextField::Content),
        b"summary" => Some(TextField::Summary),
        b"published" => Some(TextField::Published),
        b"updated" => Some(TextField::Updated),
        _ => None,
    }
}

/// Parse an Atom document into its feed metadata and entry records.
///
/// Text content is unescaped, so `content` elements carrying escaped
/// HTML come back as markup. Unknown elements are skipped.
pub fn parse(xml: &str) -> Result<AtomDocument> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut feed = AtomFeed::default();
    let mut entries: Vec<AtomEntry> = Vec::new();
    let mut current_entry: Option<AtomEntry> = None;
    let mut field: Option<TextField> = None;
    let mut text = String::new();

    loop {
        match reader
            .read_event()
            .map_err(|e| MirrorError::Parse(e.to_string()))?
        {
            Event::Start(e) => match e.local_name().as_ref() {
                b"entry" => {
                    current_entry = Some(AtomEntry {
                        etag: entry_etag(&e)?,
                        ..AtomEntry::default()
                    });
                }
                b"link" => {
                    let link = parse_link(&e)?;
                    match current_entry.as_mut() {
                        Some(entry) => entry.links.push(link),
                        None => feed.links.push(link),
                    }
                }
                name => {
                    if let Some(f) = text_field(name) {
                        field = Some(f);
                        text.clear();
                    }
                }
            },
            Event::Empty(e) => {
                if e.local_name().as_ref() == b"link" {
                    let link = parse_link(&e)?;
                    match current_entry.as_mut() {
                        Some(entry) => entry.links.push(link),
                        None => feed.links.push(link),
                    }
                }
            }
            Event::Text(e) => {
                if field.is_some() {
                    text.push_str(&e.unescape().map_err(|e| MirrorError::Parse(e.to_string()))?);
                }
            }
            Event::CData(e) => {
                if field.is_some() {
                    text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"entry" => {
                    if let Some(entry) = current_entry.take() {
                        entries.push(entry);
                    }
                }
                name => {
                    if let Some(f) = text_field(name) {
                        if field == Some(f) {
                            assign(&mut feed, current_entry.as_mut(), f, std::mem::take(&mut text));
                        }
                        field = None;
                    }
                }
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(AtomDocument { feed, entries })
}

fn assign(feed: &mut AtomFeed, entry: Option<&mut AtomEntry>, field: TextField, value: String) {
    match entry {
        Some(entry) => match field {
            TextField::Id => entry.id = Some(value),
            TextField::Title => entry.title = Some(value),
            TextField::Content => entry.content = Some(value),
            TextField::Summary => entry.summary = Some(value),
            TextField::Published => entry.published = Some(value),
            TextField::Updated => entry.updated = Some(value),
        },
        // Only `id` and `title` are captured at feed level; `updated`
        // and friends are legal there but unused.
        None => match field {
            TextField::Id => feed.id = Some(value),
            TextField::Title => feed.title = Some(value),
            _ => {}
        },
    }
}

fn entry_etag(e: &BytesStart) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| MirrorError::Parse(e.to_string()))?;
        if attr.key.as_ref() == b"gd:etag" {
            let value = attr
                .unescape_value()
                .map_err(|e| MirrorError::Parse(e.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn parse_link(e: &BytesStart) -> Result<AtomLink> {
    let mut link = AtomLink::default();
    for attr in e.attributes() {
        let attr = attr.map_err(|e| MirrorError::Parse(e.to_string()))?;
        let value = attr
            .unescape_value()
            .map_err(|e| MirrorError::Parse(e.to_string()))?
            .into_owned();
        match attr.key.as_ref() {
            b"rel" => link.rel = Some(value),
            b"type" => link.kind = Some(value),
            b"href" => link.href = Some(value),
            _ => {}
        }
    }
    Ok(link)
}

//! URL-safe entry identifiers derived from post titles.

use crate::app::error::Result;

/// Normalize `text` into a slug token: lowercased, with every run of
/// characters outside `[a-z0-9]` collapsed to a single `-` and leading or
/// trailing separators trimmed. The result can be empty when `text`
/// contains no alphanumeric characters at all.
pub fn normalize(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Derive a unique slug for a new entry.
///
/// Normalizes `title`; when `exists` reports that slug as taken, falls
/// back to normalizing `"{title}-{entry_id}"` once. The fallback is
/// unique as long as entry ids are, so no retry loop is needed; a
/// surviving collision is caught by the store's uniqueness constraint.
pub fn generate<F>(title: &str, entry_id: &str, mut exists: F) -> Result<String>
where
    F: FnMut(&str) -> Result<bool>,
{
    let slug = normalize(title);
    if exists(&slug)? {
        return Ok(normalize(&format!("{title}-{entry_id}")));
    }
    Ok(slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize("Hello World!"), "hello-world");
    }

    #[test]
    fn test_normalize_collapses_runs() {
        assert_eq!(normalize("One --  Two\t\tThree"), "one-two-three");
    }

    #[test]
    fn test_normalize_drops_plus_signs() {
        assert_eq!(normalize("C++ tips"), "c-tips");
    }

    #[test]
    fn test_normalize_trims_edges() {
        assert_eq!(normalize("  ...Hello...  "), "hello");
    }

    #[test]
    fn test_normalize_keeps_digits() {
        assert_eq!(normalize("my 1st valid id"), "my-1st-valid-id");
    }

    #[test]
    fn test_normalize_symbol_only_title_is_empty() {
        assert_eq!(normalize("!!! ???"), "");
    }

    #[test]
    fn test_generate_without_collision() {
        let slug = generate("Hello World!", "post-42", |_| Ok(false)).unwrap();
        assert_eq!(slug, "hello-world");
    }

    #[test]
    fn test_generate_appends_entry_id_on_collision() {
        let slug = generate("Hello World!", "post-42", |s| Ok(s == "hello-world")).unwrap();
        assert_eq!(slug, "hello-world-post-42");
    }

    #[test]
    fn test_generate_fallback_is_not_rechecked() {
        // Everything "exists"; the fallback is still returned as-is and
        // any true collision is left to the store constraint.
        let slug = generate("Hello World!", "post-42", |_| Ok(true)).unwrap();
        assert_eq!(slug, "hello-world-post-42");
    }
}

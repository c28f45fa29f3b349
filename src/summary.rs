//! Bounded plain-text summaries derived from raw post markup.

use regex::Regex;

/// Maximum characters of body text in a summary, excluding the ellipsis.
pub const MAX_SUMMARY_LEN: usize = 300;

const ELLIPSIS: &str = "...";

/// Strips markup and derives bounded plain-text summaries. Holds its
/// compiled patterns, so construct one and share it.
pub struct Summarizer {
    re_br: Regex,
    re_tag: Regex,
}

impl Summarizer {
    pub fn new() -> Self {
        Self {
            re_br: Regex::new(r"(?i)<\s*br\s*/?>").expect("Failed to compile line-break pattern"),
            re_tag: Regex::new(r"<[^>]*>").expect("Failed to compile tag pattern"),
        }
    }

    /// Remove markup from `text`. Line-break tags become a single space so
    /// adjacent lines stay readable; every other tag is dropped outright.
    pub fn strip_tags(&self, text: &str) -> String {
        let text = self.re_br.replace_all(text, " ");
        self.re_tag.replace_all(&text, "").into_owned()
    }

    /// Produce a bounded plain-text summary of `raw` markup.
    ///
    /// Strips tags, then cuts at the last word boundary at or before
    /// [`MAX_SUMMARY_LEN`] and appends an ellipsis when the stripped text is
    /// longer than the limit. A single token longer than the limit is cut
    /// mid-word since no boundary exists. The entities `&nbsp;` and `&quot;`
    /// are unescaped last, in both the truncated and untouched cases.
    pub fn summarize(&self, raw: &str) -> String {
        let text = self.strip_tags(raw);
        let text = if text.chars().count() > MAX_SUMMARY_LEN {
            // Inspect one character past the limit so a word that ends
            // exactly at the limit is kept whole.
            let window: Vec<char> = text.chars().take(MAX_SUMMARY_LEN + 1).collect();
            let kept: String = match window.iter().rposition(|&c| !is_word_char(c)) {
                Some(boundary) => window[..boundary].iter().collect(),
                None => window[..MAX_SUMMARY_LEN].iter().collect(),
            };
            format!("{kept}{ELLIPSIS}")
        } else {
            text
        };
        text.replace("&nbsp;", " ").replace("&quot;", "\"")
    }
}

impl Default for Summarizer {
    fn default() -> Self {
        Self::new()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

//! Size bounds for adapter output.
//!
//! [`Limits`] keeps the consuming agent's context growth predictable: every
//! list an adapter returns is capped at `max_items`, and every text field is
//! capped by one of two character limits depending on its category.
//!
//! | Category | Limit | Examples |
//! |----------|-------|----------|
//! | List endpoints | `max_items` | search results, reviews, feed entries |
//! | Long text | `max_content_length` | article bodies, readmes, fetched pages |
//! | Per-item text | `max_snippet_length` | abstracts, descriptions, self-texts |
//!
//! Limits are process-wide: they are set once at startup and never adjusted
//! per call. Bounding always runs on normalized data (plain text, extracted
//! items), never on raw markup.

use serde::{Deserialize, Serialize};

/// Default cap on items returned by list endpoints.
pub const MAX_ITEMS: usize = 10;

/// Default cap (in characters) on long-text fields.
pub const MAX_CONTENT_LENGTH: usize = 8_000;

/// Default cap (in characters) on short per-item text fields.
pub const MAX_SNIPPET_LENGTH: usize = 500;

/// Process-wide size caps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    pub max_items: usize,
    pub max_content_length: usize,
    pub max_snippet_length: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_items: MAX_ITEMS,
            max_content_length: MAX_CONTENT_LENGTH,
            max_snippet_length: MAX_SNIPPET_LENGTH,
        }
    }
}

impl Limits {
    pub fn new(max_items: usize, max_content_length: usize, max_snippet_length: usize) -> Self {
        Self {
            max_items,
            max_content_length,
            max_snippet_length,
        }
    }

    /// Bound a long-text field (article body, readme, page text).
    pub fn content(&self, text: &str) -> BoundedText {
        bound_text(text, self.max_content_length)
    }

    /// Bound a short per-item text field (snippet, abstract, description).
    pub fn snippet(&self, text: &str) -> BoundedText {
        bound_text(text, self.max_snippet_length)
    }

    /// Bound a list to `max_items`.
    pub fn items<T>(&self, items: Vec<T>) -> (Vec<T>, bool) {
        bound_items(items, self.max_items)
    }

    /// Clamp a caller-requested count into `1..=max_items`.
    ///
    /// Arguments such as `limit` may lower the list cap, never raise it.
    pub fn clamp_count(&self, requested: Option<u64>) -> usize {
        let cap = self.max_items.max(1);
        match requested {
            Some(n) => (n as usize).clamp(1, cap),
            None => cap,
        }
    }
}

/// Text guaranteed to be at most the cap it was bounded with.
///
/// When `truncated` is true, `original_chars` tells the caller how much was
/// dropped. The text itself carries no marker, so its length never exceeds
/// the cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundedText {
    pub text: String,
    pub truncated: bool,
    pub original_chars: usize,
}

impl BoundedText {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of characters removed by truncation.
    pub fn omitted_chars(&self) -> usize {
        self.original_chars - self.text.chars().count()
    }
}

/// Keep the first `max_chars` characters of `text`.
///
/// This is a plain character-count cut: it never splits a UTF-8 sequence,
/// but it may split a word or a grapheme cluster.
pub fn bound_text(text: &str, max_chars: usize) -> BoundedText {
    match text.char_indices().nth(max_chars) {
        None => BoundedText {
            text: text.to_string(),
            truncated: false,
            original_chars: text.chars().count(),
        },
        Some((cut, _)) => BoundedText {
            text: text[..cut].to_string(),
            truncated: true,
            original_chars: text.chars().count(),
        },
    }
}

/// Keep the first `max_items` elements of `items`, in their original order.
pub fn bound_items<T>(mut items: Vec<T>, max_items: usize) -> (Vec<T>, bool) {
    if items.len() <= max_items {
        return (items, false);
    }
    items.truncate(max_items);
    (items, true)
}

//! Chapter record shared by the scraper and the template renderer.

use serde::Serialize;

/// One scraped chapter in index order.
///
/// Templates see it as `item.title` and `item.content`. `content` is the serialized
/// body region with boilerplate removed and image sources localized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chapter {
    pub title: String,
    pub content: String,
}

/// In-document anchor for a chapter title: the title with all whitespace removed.
///
/// The scraper stamps this onto the body region as its `id` and the templates link to
/// it through the `anchor` filter. The result must be a valid XML `id`, so characters
/// that cannot appear in a name are dropped as well, and an anchor that would not
/// start with a letter or `_` (digits, punctuation, empty title) gets a `ch-` prefix.
pub(crate) fn anchor_for(title: &str) -> String {
    let anchor: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();
    match anchor.chars().next() {
        Some(c) if c.is_alphabetic() || c == '_' => anchor,
        _ => format!("ch-{}", anchor),
    }
}

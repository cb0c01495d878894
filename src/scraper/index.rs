//! Index page: the ordered list of chapter links.

use crate::scraper::{parse_selector, ScraperError, WikiClient, INDEX_SELECTOR};
use scraper::Html;

/// Fetch the index page at `start_url` and return the chapter hrefs in document order.
///
/// Duplicates are kept. A page without a content region yields an empty list.
pub fn scrape_index(client: &mut WikiClient, start_url: &str) -> Result<Vec<String>, ScraperError> {
    tracing::info!("Getting index...");
    let doc = client.get_html(start_url)?;
    let items = chapter_links(&doc)?;
    if items.is_empty() {
        tracing::warn!(url = start_url, "No chapter links found under {}", INDEX_SELECTOR);
    }
    tracing::info!("Got {} items", items.len());
    Ok(items)
}

fn chapter_links(doc: &Html) -> Result<Vec<String>, ScraperError> {
    let sel = parse_selector(INDEX_SELECTOR)?;
    let mut items = Vec::new();
    for a in doc.select(&sel) {
        match a.value().attr("href") {
            Some(href) => items.push(href.to_string()),
            None => tracing::debug!("Skipping index anchor without href"),
        }
    }
    Ok(items)
}

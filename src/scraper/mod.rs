//! Wiki scraping: shared client, index page, chapter pages, and body serialization.

mod chapter;
mod client;
mod error;
mod index;
mod markup;

pub use chapter::{scrape_chapter, IMAGES_DIR};
pub use client::{WikiClient, WikiClientBuilder};
pub use error::ScraperError;
pub use index::scrape_index;

use scraper::Selector;

/// Anchors inside the content region of the index page, in reading order.
pub const INDEX_SELECTOR: &str = "#content li a";
/// The chapter page heading; its text is the chapter title.
pub const HEADING_SELECTOR: &str = "#firstHeading";
/// The chapter page body region that becomes the chapter content.
pub const BODY_SELECTOR: &str = "#bodyContent";
/// Presentational wiki artifacts dropped from every chapter body, in removal order.
pub const BOILERPLATE_SELECTORS: &[&str] = &[
    "#siteSub",
    "#contentSub",
    "#jump-to-nav",
    ".editsection",
    ".printfooter",
    ".catlinks",
    ".visualClear",
];

/// Parse a CSS selector or return a parse error (avoids panics from Selector::parse).
fn parse_selector(sel: &str) -> Result<Selector, ScraperError> {
    Selector::parse(sel).map_err(|e| ScraperError::InvalidSelector {
        selector: sel.to_string(),
        message: e.to_string(),
    })
}

//! Shared error type for fetching and scraping wiki pages.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from the fetcher, the index scraper, and the chapter scraper.
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("Network error: could not reach {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} when fetching: {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Failed to read response body from {url}: {source}")]
    BodyRead {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid selector {selector:?}: {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("Could not find {selector} in page at {url}.")]
    MissingElement { selector: String, url: String },

    #[error("Cannot write image {path}: {source}")]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

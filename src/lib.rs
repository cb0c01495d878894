//! wikipub: scrape a wiki-hosted book chapter by chapter and package it as EPUB.

pub mod cli;
pub mod config;
pub mod epub;
pub mod logging;
pub mod model;
pub mod scraper;

// Re-exports for CLI and consumers.
pub use crate::epub::{
    archive_path, create_epub_directory, package_epub, render_templates, EpubError, RenderContext,
};
pub use crate::model::Chapter;
pub use crate::scraper::{scrape_chapter, scrape_index, ScraperError, WikiClient, WikiClientBuilder};

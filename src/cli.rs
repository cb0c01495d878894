//! CLI parsing and orchestration. Resolves settings, runs index -> chapters -> templates -> zip.
//! Maps errors to exit codes.

use crate::config::{self, Config};
use crate::epub::{
    archive_path, create_epub_directory, package_epub, render_templates, EpubError, RenderContext,
};
use crate::logging;
use crate::scraper::{scrape_chapter, scrape_index, ScraperError, WikiClient};
use clap::Parser;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_DOMAIN: &str = "http://www.appropedia.org";
pub const DEFAULT_START_PATH: &str = "/TheFWD_index";
pub const DEFAULT_TITLE: &str = "The Future We Deserve";
pub const DEFAULT_OUTPUT: &str = "tfwd";
pub const DEFAULT_TEMPLATES_DIR: &str = "templates";
pub const DEFAULT_LOG_FILE: &str = "epub.log";

/// CLI error carrying exit code and message.
#[derive(Debug, Error)]
pub enum CliRunError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Scraper(#[from] ScraperError),

    #[error("{0}")]
    Epub(#[from] EpubError),

    #[error("{0}")]
    Validation(String),
}

impl CliRunError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliRunError::InvalidInput(_) => 1,
            CliRunError::Scraper(_) => 2,
            CliRunError::Epub(_) | CliRunError::Validation(_) => 3,
        }
    }
}

/// Run epubcheck on the given EPUB path. Requires epubcheck on PATH.
fn validate_epub(path: &Path) -> Result<(), CliRunError> {
    let output = std::process::Command::new("epubcheck")
        .arg(path)
        .output()
        .map_err(|e| {
            CliRunError::Validation(format!(
                "Could not run epubcheck: {}. Is epubcheck installed and on PATH?",
                e
            ))
        })?;
    if output.status.success() {
        tracing::info!("epubcheck passed for {}", path.display());
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let msg = if stderr.is_empty() { stdout } else { stderr };
        Err(CliRunError::Validation(format!(
            "epubcheck reported errors:\n{}",
            msg.trim()
        )))
    }
}

#[derive(Parser, Debug, Default)]
#[command(name = "wikipub")]
#[command(about = "Scrape a wiki-hosted book and package it as EPUB")]
#[command(
    after_help = "With no flags, scrapes \"The Future We Deserve\" from www.appropedia.org into ./tfwd and ./tfwd.epub. Config file keys (domain, start_path, title, output, templates_dir, log_file, user_agent, timeout_secs, request_delay_secs) are read from ./wikipub.toml or the user config dir. CLI flags override config."
)]
pub struct Args {
    /// Scheme and host prepended to chapter and image paths.
    #[arg(long)]
    pub domain: Option<String>,

    /// Path of the index page under the domain.
    #[arg(long)]
    pub start: Option<String>,

    /// Book title passed to the templates.
    #[arg(long)]
    pub title: Option<String>,

    /// Output directory (must not exist). The archive is written beside it as <output>.epub.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Template tree to render into the output directory.
    #[arg(long)]
    pub templates: Option<PathBuf>,

    /// Log file (appended).
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// HTTP User-Agent (overrides config).
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Request timeout in seconds (overrides config; default: HTTP client default).
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Delay between requests in seconds (overrides config; default 0).
    #[arg(long)]
    pub delay: Option<u64>,

    /// Fetch the index only, print chapter count and archive path without writing.
    #[arg(long)]
    pub dry_run: bool,

    /// After writing the EPUB, run epubcheck to validate it (epubcheck must be on PATH).
    #[arg(long)]
    pub validate: bool,

    /// Print verbose error chain.
    #[arg(long)]
    pub verbose: bool,
}

/// Effective settings after applying CLI flags over config over defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub domain: String,
    pub start_url: String,
    pub title: String,
    pub output: PathBuf,
    pub templates_dir: PathBuf,
    pub log_file: PathBuf,
    pub user_agent: Option<String>,
    pub timeout_secs: Option<u64>,
    pub delay_secs: u64,
}

impl Settings {
    pub fn resolve(args: &Args, config: Option<&Config>) -> Self {
        let domain = args
            .domain
            .clone()
            .or_else(|| config.and_then(|c| c.domain.clone()))
            .unwrap_or_else(|| DEFAULT_DOMAIN.to_string());
        let start_path = args
            .start
            .clone()
            .or_else(|| config.and_then(|c| c.start_path.clone()))
            .unwrap_or_else(|| DEFAULT_START_PATH.to_string());
        Settings {
            start_url: format!("{}{}", domain, start_path),
            domain,
            title: args
                .title
                .clone()
                .or_else(|| config.and_then(|c| c.title.clone()))
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            output: args
                .output
                .clone()
                .or_else(|| config.and_then(|c| c.output.clone()))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            templates_dir: args
                .templates
                .clone()
                .or_else(|| config.and_then(|c| c.templates_dir.clone()))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATES_DIR)),
            log_file: args
                .log_file
                .clone()
                .or_else(|| config.and_then(|c| c.log_file.clone()))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
            user_agent: args
                .user_agent
                .clone()
                .or_else(|| config.and_then(|c| c.user_agent.clone())),
            timeout_secs: args.timeout.or_else(|| config.and_then(|c| c.timeout_secs)),
            delay_secs: args
                .delay
                .or_else(|| config.and_then(|c| c.request_delay_secs))
                .unwrap_or(0),
        }
    }

    /// Build the HTTP client these settings describe.
    pub fn client(&self) -> Result<WikiClient, CliRunError> {
        let mut builder = WikiClient::builder().delay_secs(self.delay_secs);
        if let Some(ua) = &self.user_agent {
            builder = builder.user_agent(ua.clone());
        }
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout_secs(secs);
        }
        builder
            .build()
            .map_err(|e| CliRunError::InvalidInput(format!("Failed to create HTTP client: {}", e)))
    }
}

/// Run the whole conversion and return the path of the written archive.
///
/// Chapters are fetched one at a time in index order. Any failure aborts and leaves the
/// partially built output directory in place.
pub fn build_book(settings: &Settings, client: &mut WikiClient) -> Result<PathBuf, CliRunError> {
    tracing::info!("{}", settings.title);
    create_epub_directory(&settings.templates_dir, &settings.output)?;
    let chapter_urls = scrape_index(client, &settings.start_url)?;
    let mut chapters = Vec::with_capacity(chapter_urls.len());
    for target in &chapter_urls {
        chapters.push(scrape_chapter(
            client,
            &settings.domain,
            target,
            &settings.output,
        )?);
    }
    let context = RenderContext::new(settings.title.clone(), chapters);
    render_templates(&settings.templates_dir, &settings.output, &context)?;
    let dest = archive_path(&settings.output);
    package_epub(&settings.output, &dest)?;
    tracing::info!("DONE");
    Ok(dest)
}

/// Entry point for the CLI. Returns Ok(()) on success; Err with exit code and message on failure.
pub fn run(args: &Args) -> Result<(), CliRunError> {
    let config = config::load_config().map_err(CliRunError::InvalidInput)?;
    let settings = Settings::resolve(args, config.as_ref());
    logging::init(&settings.log_file).map_err(CliRunError::InvalidInput)?;
    let mut client = settings.client()?;

    if args.dry_run {
        let chapter_urls = scrape_index(&mut client, &settings.start_url)?;
        eprintln!("Chapters: {}", chapter_urls.len());
        eprintln!("Output: {}", archive_path(&settings.output).display());
        return Ok(());
    }

    let dest = build_book(&settings, &mut client)?;
    if args.validate {
        validate_epub(&dest)?;
    }
    Ok(())
}

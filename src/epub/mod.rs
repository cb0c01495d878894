//! EPUB assembly: output directory layout, template rendering, and zip packaging.
//!
//! The output directory mirrors the template tree. Chapter images are written into it
//! by the scraper, templates are rendered into it, and the whole tree is zipped with
//! `mimetype` stored first.

mod layout;
mod package;
mod render;

pub use layout::create_epub_directory;
pub use package::{archive_path, package_epub};
pub use render::{render_templates, RenderContext};

use std::path::PathBuf;
use thiserror::Error;

/// Errors from building the output tree, rendering templates, or packaging.
#[derive(Debug, Error)]
pub enum EpubError {
    #[error("Output directory {path} already exists. Remove it before running again.")]
    OutputExists { path: PathBuf },

    #[error("Cannot write EPUB tree: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot walk template directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Failed to render template {name}: {source}")]
    Template {
        name: String,
        #[source]
        source: minijinja::Error,
    },

    #[error("Cannot package EPUB: {path} has no mimetype file.")]
    MissingMimetype { path: PathBuf },

    #[error("Failed to write EPUB archive: {0}")]
    Zip(#[from] zip::result::ZipError),
}

impl From<std::io::Error> for EpubError {
    fn from(e: std::io::Error) -> Self {
        EpubError::Zip(zip::result::ZipError::Io(e))
    }
}

const MIMETYPE_FILE: &str = "mimetype";

fn io_error(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> EpubError {
    let path = path.into();
    move |source| EpubError::Io { path, source }
}

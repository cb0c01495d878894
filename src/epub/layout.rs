//! Output directory creation.

use crate::epub::{io_error, EpubError};
use std::path::Path;
use walkdir::WalkDir;

/// Create `output_dir` and mirror every subdirectory of `templates_dir` into it.
///
/// Fails with [EpubError::OutputExists] if `output_dir` is already there; runs are not
/// idempotent and a leftover tree must be removed by hand. Files are not copied here.
pub fn create_epub_directory(templates_dir: &Path, output_dir: &Path) -> Result<(), EpubError> {
    tracing::info!(
        "Creating EPUB in temporary directory {}",
        output_dir.display()
    );
    if output_dir.exists() {
        return Err(EpubError::OutputExists {
            path: output_dir.to_path_buf(),
        });
    }
    std::fs::create_dir(output_dir).map_err(io_error(output_dir))?;
    for entry in WalkDir::new(templates_dir).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(templates_dir)
            .unwrap_or(entry.path());
        let target = output_dir.join(rel);
        std::fs::create_dir(&target).map_err(io_error(&target))?;
    }
    Ok(())
}

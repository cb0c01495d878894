//! Zip packaging of a finished output tree.

use crate::epub::{io_error, EpubError, MIMETYPE_FILE};
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Where the archive for `output_dir` goes: `<output_dir>.epub` beside the directory.
pub fn archive_path(output_dir: &Path) -> PathBuf {
    let mut name = output_dir
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "book".into());
    name.push(".epub");
    output_dir.with_file_name(name)
}

/// Zip `output_dir` into the EPUB at `dest`.
///
/// `mimetype` is the first entry and is stored uncompressed. Every other file follows in
/// sorted path order, deflated at level 9. Directories get no entries of their own.
pub fn package_epub(output_dir: &Path, dest: &Path) -> Result<(), EpubError> {
    tracing::info!("Zipping up EPUB");
    let mimetype = std::fs::read(output_dir.join(MIMETYPE_FILE)).map_err(|_| {
        EpubError::MissingMimetype {
            path: output_dir.to_path_buf(),
        }
    })?;

    let file = std::fs::File::create(dest).map_err(io_error(dest))?;
    let mut zip = ZipWriter::new(file);

    let options_stored = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored)
        .unix_permissions(0o644);
    let options_deflate = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .compression_level(Some(9))
        .unix_permissions(0o644);

    zip.start_file(MIMETYPE_FILE, options_stored)?;
    zip.write_all(&mimetype)?;

    for entry in WalkDir::new(output_dir).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(output_dir)
            .unwrap_or(entry.path());
        let name = entry_name(rel);
        if name == MIMETYPE_FILE {
            continue;
        }
        let data = std::fs::read(entry.path()).map_err(io_error(entry.path()))?;
        zip.start_file(name, options_deflate)?;
        zip.write_all(&data)?;
    }

    zip.finish()?;
    tracing::debug!("Wrote {}", dest.display());
    Ok(())
}

fn entry_name(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

//! Template rendering into the output tree.

use crate::epub::{io_error, EpubError};
use crate::model::{anchor_for, Chapter};
use crate::scraper::IMAGES_DIR;
use minijinja::{context, AutoEscape, Environment, UndefinedBehavior, Value};
use serde::Serialize;
use std::path::{Component, Path};
use walkdir::WalkDir;

/// Template files with these extensions are copied byte for byte instead of rendered.
const BINARY_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// Data visible to every template: `title`, `uuid`, `date`, and `items`.
#[derive(Debug, Clone, Serialize)]
pub struct RenderContext {
    pub title: String,
    pub uuid: String,
    /// Local date of the run, `YYYY-MM-DD`.
    pub date: String,
    pub items: Vec<Chapter>,
}

impl RenderContext {
    /// Build a context with a fresh v4 UUID and today's date.
    pub fn new(title: impl Into<String>, items: Vec<Chapter>) -> Self {
        Self {
            title: title.into(),
            uuid: uuid::Uuid::new_v4().to_string(),
            date: chrono::Local::now().date_naive().format("%Y-%m-%d").to_string(),
            items,
        }
    }
}

/// A downloaded chapter image, as listed in the package manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestImage {
    pub id: String,
    /// Path relative to `OEBPS/`, e.g. `images/foo.png`.
    pub href: String,
    pub media_type: &'static str,
}

/// Walk `templates_dir` and write every file into the same relative path under `output_dir`.
///
/// Binary assets are copied; every other file is rendered as a template against `context`.
/// Besides the context fields, templates see `images`: every file already written to
/// `<output_dir>/OEBPS/images` that does not come from the template tree itself.
/// Undefined variables and template syntax errors abort with [EpubError::Template].
/// Templates also get an `anchor` filter that matches the `id` stamped on each chapter body.
pub fn render_templates(
    templates_dir: &Path,
    output_dir: &Path,
    context: &RenderContext,
) -> Result<(), EpubError> {
    let env = template_env(templates_dir);
    let images = chapter_images(templates_dir, output_dir)?;
    tracing::debug!("Declaring {} chapter images", images.len());
    let ctx = context! { images => images, ..Value::from_serialize(context) };
    for entry in WalkDir::new(templates_dir).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(templates_dir)
            .unwrap_or(entry.path());
        let dest = output_dir.join(rel);
        tracing::info!("Processing template {}", rel.display());
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(io_error(parent))?;
        }
        if is_binary_asset(rel) {
            std::fs::copy(entry.path(), &dest).map_err(io_error(&dest))?;
            continue;
        }
        let name = template_name(rel);
        let rendered = env
            .get_template(&name)
            .and_then(|t| t.render(&ctx))
            .map_err(|source| EpubError::Template {
                name: name.clone(),
                source,
            })?;
        std::fs::write(&dest, rendered).map_err(io_error(&dest))?;
    }
    Ok(())
}

/// Images under `<output_dir>/OEBPS/images` in file name order, minus template assets.
fn chapter_images(
    templates_dir: &Path,
    output_dir: &Path,
) -> Result<Vec<ManifestImage>, EpubError> {
    let images_dir = output_dir.join(IMAGES_DIR);
    if !images_dir.is_dir() {
        return Ok(Vec::new());
    }
    let shipped = templates_dir.join(IMAGES_DIR);
    let mut images = Vec::new();
    for entry in WalkDir::new(&images_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() || shipped.join(entry.file_name()).exists() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        images.push(ManifestImage {
            id: format!("image-{}", images.len() + 1),
            media_type: media_type(&name),
            href: format!("images/{}", name),
        });
    }
    Ok(images)
}

fn media_type(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

fn template_env(templates_dir: &Path) -> Environment<'static> {
    let mut env = Environment::new();
    env.set_loader(minijinja::path_loader(templates_dir));
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_auto_escape_callback(auto_escape_for);
    env.add_filter("anchor", |title: String| anchor_for(&title));
    env
}

fn auto_escape_for(name: &str) -> AutoEscape {
    match name.rsplit_once('.').map(|(_, ext)| ext) {
        Some("html" | "xhtml" | "xml" | "opf" | "ncx") => AutoEscape::Html,
        _ => AutoEscape::None,
    }
}

fn is_binary_asset(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| BINARY_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Loader name for a relative template path: components joined with `/`.
fn template_name(rel: &Path) -> String {
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

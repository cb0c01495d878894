//! Chapter pages: title, cleaned body, and localized images.

use crate::model::{anchor_for, Chapter};
use crate::scraper::markup::{serialize_element, AttrOverrides};
use crate::scraper::{
    parse_selector, ScraperError, WikiClient, BODY_SELECTOR, BOILERPLATE_SELECTORS,
    HEADING_SELECTOR,
};
use ego_tree::NodeId;
use scraper::{ElementRef, Html};
use std::path::{Path, PathBuf};

/// Directory (relative to the output root) that receives chapter images.
pub const IMAGES_DIR: &str = "OEBPS/images";

/// Fetch `domain + target` and turn it into a [Chapter].
///
/// Boilerplate is removed from the body region, the body gets the chapter anchor as
/// its `id`, and every image is downloaded from `domain + src` into
/// `<output_dir>/OEBPS/images/` with its `src` rewritten to `images/<filename>`.
///
/// An image `src` without any `/` stops image processing for the rest of the chapter:
/// that image and all later ones keep their original `src` and nothing is written for them.
pub fn scrape_chapter(
    client: &mut WikiClient,
    domain: &str,
    target: &str,
    output_dir: &Path,
) -> Result<Chapter, ScraperError> {
    tracing::info!("Processing {}", target);
    let url = format!("{}{}", domain, target);
    let mut doc = client.get_html(&url)?;
    extract_chapter(&mut doc, &url, output_dir, |src| {
        tracing::info!("Grabbing image from {}", src);
        client.get_bytes(&format!("{}{}", domain, src))
    })
}

fn extract_chapter<F>(
    doc: &mut Html,
    url: &str,
    output_dir: &Path,
    mut fetch_image: F,
) -> Result<Chapter, ScraperError>
where
    F: FnMut(&str) -> Result<Vec<u8>, ScraperError>,
{
    let heading_sel = parse_selector(HEADING_SELECTOR)?;
    let title = doc
        .select(&heading_sel)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
        .ok_or_else(|| missing(HEADING_SELECTOR, url))?;

    let body_sel = parse_selector(BODY_SELECTOR)?;
    let body_id = doc
        .select(&body_sel)
        .next()
        .map(|e| e.id())
        .ok_or_else(|| missing(BODY_SELECTOR, url))?;

    for sel in BOILERPLATE_SELECTORS {
        let sel = parse_selector(sel)?;
        let doomed: Vec<NodeId> = body(doc, body_id, url)?
            .select(&sel)
            .map(|e| e.id())
            .filter(|id| *id != body_id)
            .collect();
        for id in doomed {
            if let Some(mut node) = doc.tree.get_mut(id) {
                node.detach();
            }
        }
    }

    let mut overrides = AttrOverrides::default();
    overrides.set(body_id, "id", anchor_for(&title));

    let img_sel = parse_selector("img")?;
    let images: Vec<(NodeId, Option<String>)> = body(doc, body_id, url)?
        .select(&img_sel)
        .map(|e| (e.id(), e.value().attr("src").map(String::from)))
        .collect();
    for (id, src) in images {
        let Some(src) = src else {
            tracing::debug!("Skipping image without src");
            continue;
        };
        let Some((_, filename)) = src.rsplit_once('/') else {
            tracing::warn!(
                "Image src {:?} has no path; leaving remaining images in {} untouched",
                src,
                url
            );
            break;
        };
        if filename.is_empty() {
            tracing::warn!("Image src {:?} has no file name; skipping", src);
            continue;
        }
        let data = fetch_image(&src)?;
        let path = image_path(output_dir, filename);
        write_image(&path, &data)?;
        overrides.set(id, "src", format!("images/{}", filename));
    }

    let content = serialize_element(body(doc, body_id, url)?, &overrides);
    Ok(Chapter { title, content })
}

fn body<'a>(doc: &'a Html, id: NodeId, url: &str) -> Result<ElementRef<'a>, ScraperError> {
    doc.tree
        .get(id)
        .and_then(ElementRef::wrap)
        .ok_or_else(|| missing(BODY_SELECTOR, url))
}

fn missing(selector: &str, url: &str) -> ScraperError {
    ScraperError::MissingElement {
        selector: selector.to_string(),
        url: url.to_string(),
    }
}

fn image_path(output_dir: &Path, filename: &str) -> PathBuf {
    output_dir.join(IMAGES_DIR).join(filename)
}

fn write_image(path: &Path, data: &[u8]) -> Result<(), ScraperError> {
    let to_err = |e| ScraperError::ImageWrite {
        path: path.to_path_buf(),
        source: e,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(to_err)?;
    }
    std::fs::write(path, data).map_err(to_err)
}

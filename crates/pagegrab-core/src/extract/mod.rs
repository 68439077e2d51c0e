//! HTML analysis: image URL discovery and the page structure summary.
//!
//! Parsing is done once with `scraper`; callers that already hold an
//! [`Html`] document use the `*_from_document` variants.

mod css;
mod images;
mod structure;

pub use css::{css_url_references, has_image_extension, IMAGE_EXTENSIONS};
pub use images::{image_urls_from_document, IMG_SOURCE_ATTRIBUTES};
pub use structure::{
    page_title, structure_from_document, Heading, Link, PageStructure, DEFAULT_MAX_LINKS,
};

use anyhow::{Context, Result};
use scraper::{ElementRef, Html};
use std::collections::BTreeSet;
use url::Url;

/// Parses `html` and returns the sorted, deduplicated set of absolute image URLs.
///
/// `base_url` is the page's final URL; relative references resolve against it.
/// Every entry of `supplementary` is added unconditionally.
pub fn extract_image_urls(
    html: &str,
    base_url: &str,
    supplementary: &[String],
) -> Result<BTreeSet<String>> {
    let base = Url::parse(base_url).with_context(|| format!("invalid base URL: {}", base_url))?;
    let document = Html::parse_document(html);
    Ok(image_urls_from_document(&document, &base, supplementary))
}

/// Parses `html` and summarizes its title, description, headings and first links.
pub fn extract_structure(html: &str, max_links: usize) -> PageStructure {
    let document = Html::parse_document(html);
    structure_from_document(&document, max_links)
}

/// Text of `el` with each fragment trimmed and empty fragments dropped.
pub(crate) fn stripped_text(el: ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

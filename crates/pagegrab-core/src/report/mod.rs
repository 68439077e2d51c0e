//! JSON artifacts written at the end of a run.
//!
//! Both files are pretty-printed with 2-space indentation; non-ASCII text is
//! kept as-is rather than `\u` escaped.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::downloader::DownloadRecord;
use crate::storage;

pub const PAGE_HTML_FILE: &str = "page.html";
pub const IMAGES_INFO_FILE: &str = "images_info.json";
pub const PAGE_STRUCTURE_FILE: &str = "page_structure.json";

/// Files a run writes next to the images.
pub const REPORT_FILES: [&str; 3] = [PAGE_HTML_FILE, IMAGES_INFO_FILE, PAGE_STRUCTURE_FILE];

/// Contents of `images_info.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagesManifest {
    pub page_url: String,
    pub page_title: String,
    /// Size of the discovered URL set, including failed downloads.
    pub total_images: usize,
    pub downloaded: usize,
    pub images: Vec<DownloadRecord>,
}

impl ImagesManifest {
    pub fn new(
        page_url: &str,
        page_title: &str,
        total_images: usize,
        images: Vec<DownloadRecord>,
    ) -> Self {
        Self {
            page_url: page_url.to_string(),
            page_title: page_title.to_string(),
            total_images,
            downloaded: images.len(),
            images,
        }
    }
}

/// Serializes `value` as pretty JSON and writes it to `path`.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("serialize {}", path.display()))?;
    storage::write_file(path, json.as_bytes())?;
    tracing::debug!(path = %path.display(), bytes = json.len(), "report written");
    Ok(())
}

/// Writes the fetched HTML verbatim.
pub fn write_page_html(path: &Path, html: &str) -> Result<()> {
    storage::write_file(path, html.as_bytes())
}

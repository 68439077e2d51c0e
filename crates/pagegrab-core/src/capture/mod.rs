//! One full run: fetch the page, save it, collect image URLs, download them,
//! and write the two JSON reports.
//!
//! Only the page fetch and the report writes are fatal. Nothing touches the
//! output directory until the page fetch has succeeded.

use anyhow::{Context, Result};
use scraper::Html;
use std::fs;
use std::path::PathBuf;
use url::Url;

use crate::config::CaptureConfig;
use crate::downloader;
use crate::extract;
use crate::http;
use crate::progress::Progress;
use crate::report::{self, ImagesManifest, IMAGES_INFO_FILE, PAGE_HTML_FILE, PAGE_STRUCTURE_FILE};

/// Where the run wrote its outputs and how many images made it.
#[derive(Debug, Clone)]
pub struct CaptureSummary {
    pub html_path: PathBuf,
    pub images_info_path: PathBuf,
    pub page_structure_path: PathBuf,
    pub total_images: usize,
    pub downloaded: usize,
}

/// Runs a capture as described by `cfg`, reporting stages to `on_progress`.
pub fn run(cfg: &CaptureConfig, on_progress: &mut dyn FnMut(Progress<'_>)) -> Result<CaptureSummary> {
    cfg.validate()?;
    let opts = cfg.http_options();
    let out_dir = &cfg.output_dir;

    on_progress(Progress::FetchingPage { url: &cfg.page_url });
    tracing::info!(url = %cfg.page_url, "fetching page");
    let page = http::fetch_page(&cfg.page_url, &opts)
        .with_context(|| format!("failed to fetch page {}", cfg.page_url))?;

    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output directory {}", out_dir.display()))?;
    let html_path = out_dir.join(PAGE_HTML_FILE);
    report::write_page_html(&html_path, &page.html)?;
    on_progress(Progress::PageSaved { path: &html_path });

    let base = Url::parse(&page.final_url)
        .with_context(|| format!("invalid final page URL {}", page.final_url))?;
    let document = Html::parse_document(&page.html);
    let image_urls = extract::image_urls_from_document(&document, &base, &cfg.supplementary_urls);
    let title = extract::page_title(&document);
    let structure = extract::structure_from_document(&document, cfg.max_links);
    drop(document);

    let total_images = image_urls.len();
    on_progress(Progress::ImagesDiscovered { total: total_images });
    tracing::info!(total_images, "image URLs discovered");

    let records = downloader::download_all(&image_urls, out_dir, &opts, on_progress);

    let manifest = ImagesManifest::new(&cfg.page_url, &title, total_images, records);
    let images_info_path = out_dir.join(IMAGES_INFO_FILE);
    report::write_json(&images_info_path, &manifest)?;

    let page_structure_path = out_dir.join(PAGE_STRUCTURE_FILE);
    report::write_json(&page_structure_path, &structure)?;

    tracing::info!(
        downloaded = manifest.downloaded,
        total_images,
        dir = %out_dir.display(),
        "capture complete"
    );

    Ok(CaptureSummary {
        html_path,
        images_info_path,
        page_structure_path,
        total_images,
        downloaded: manifest.downloaded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_fails_before_any_output() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = CaptureConfig {
            page_url: "not a url".to_string(),
            output_dir: dir.path().join("out"),
            ..CaptureConfig::default()
        };
        let mut events = Vec::new();
        let err = run(&cfg, &mut |p| events.push(p.describe())).unwrap_err();
        assert!(format!("{:#}", err).contains("page_url"));
        assert!(events.is_empty());
        assert!(!dir.path().join("out").exists());
    }
}

//! Sequential image downloader.
//!
//! Walks the image URL set in sorted order, one GET at a time. A failed item
//! is logged and skipped; it never aborts the loop.

mod single;

pub use single::fetch_to;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::http::HttpOptions;
use crate::progress::Progress;
use crate::report::REPORT_FILES;
use crate::storage::resolve_collision;
use crate::url_model::derive_image_filename;

/// One successfully written image, as listed in `images_info.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRecord {
    pub url: String,
    /// Name actually written (after collision suffixing).
    pub filename: String,
    /// `target_dir` joined with `filename`.
    pub path: String,
}

/// Picks the path `url` will be saved to inside `target_dir`.
///
/// The report file names are never handed out to images.
pub fn plan_target(url: &str, target_dir: &Path) -> PathBuf {
    resolve_collision(target_dir, &derive_image_filename(url), &REPORT_FILES)
}

/// Downloads a single image into `target_dir` under a collision-free name.
pub fn download_one(url: &str, target_dir: &Path, opts: &HttpOptions) -> Result<DownloadRecord> {
    download_announced(url, target_dir, opts, |_| {})
}

/// Plans the target, passes its file name to `announce`, then fetches.
fn download_announced(
    url: &str,
    target_dir: &Path,
    opts: &HttpOptions,
    announce: impl FnOnce(&str),
) -> Result<DownloadRecord> {
    let target = plan_target(url, target_dir);
    let filename = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    announce(&filename);
    fetch_to(url, &target, opts)
}

/// Downloads every URL in iteration order, reporting each attempt through
/// `on_progress`. Returns records for the successful downloads only, in
/// attempt order.
pub fn download_all<'u, I>(
    urls: I,
    target_dir: &Path,
    opts: &HttpOptions,
    on_progress: &mut dyn FnMut(Progress<'_>),
) -> Vec<DownloadRecord>
where
    I: IntoIterator<Item = &'u String>,
    I::IntoIter: ExactSizeIterator,
{
    let urls = urls.into_iter();
    let total = urls.len();
    let mut records = Vec::with_capacity(total);

    for (i, url) in urls.enumerate() {
        let index = i + 1;
        let result = download_announced(url, target_dir, opts, |filename| {
            on_progress(Progress::Downloading {
                index,
                total,
                url,
                filename,
            })
        });

        match result {
            Ok(record) => records.push(record),
            Err(e) => {
                let error = format!("{:#}", e);
                tracing::warn!(url = %url, "image download failed: {}", error);
                on_progress(Progress::DownloadFailed {
                    index,
                    total,
                    url,
                    error: &error,
                });
            }
        }
    }

    tracing::info!(downloaded = records.len(), total, "download loop finished");
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn plan_target_suffixes_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let first = plan_target("https://a.test/x/pic.jpg", dir.path());
        assert_eq!(first, dir.path().join("pic.jpg"));

        fs::write(&first, b"a").unwrap();
        let second = plan_target("https://b.test/y/pic.jpg", dir.path());
        assert_eq!(second, dir.path().join("pic_1.jpg"));
    }

    #[test]
    fn download_all_with_nothing_to_do() {
        let dir = tempfile::tempdir().unwrap();
        let opts = crate::config::CaptureConfig::default().http_options();
        let mut events = 0;
        let urls: Vec<String> = Vec::new();
        let records = download_all(&urls, dir.path(), &opts, &mut |_| events += 1);
        assert!(records.is_empty());
        assert_eq!(events, 0);
    }

    #[test]
    fn plan_target_skips_report_file_names() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            plan_target("https://a.test/images_info.json", dir.path()),
            dir.path().join("images_info_1.json")
        );
        assert_eq!(
            plan_target("https://a.test/data/page_structure.json", dir.path()),
            dir.path().join("page_structure_1.json")
        );
    }

    #[test]
    fn download_one_failure_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let opts = crate::config::CaptureConfig::default().http_options();
        let err = download_one("nosuchscheme://host/pic.png", dir.path(), &opts).unwrap_err();
        assert!(format!("{:#}", err).contains("nosuchscheme://host/pic.png"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn download_all_reports_planned_name_then_failure() {
        let dir = tempfile::tempdir().unwrap();
        let opts = crate::config::CaptureConfig::default().http_options();
        let urls = vec!["nosuchscheme://host/pic.png".to_string()];
        let mut lines = Vec::new();
        let records = download_all(&urls, dir.path(), &opts, &mut |p| lines.push(p.describe()));
        assert!(records.is_empty());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "[1/1] Downloading: pic.png");
    }
}

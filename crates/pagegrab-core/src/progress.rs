//! Progress events emitted while a capture runs.
//!
//! The engine reports through a caller-supplied callback; the CLI turns these
//! into console lines. Events borrow from the engine and are valid only for
//! the duration of the call.

use std::path::Path;

#[derive(Debug, Clone, Copy)]
pub enum Progress<'a> {
    /// The page GET is about to start.
    FetchingPage { url: &'a str },
    /// Raw HTML written to disk.
    PageSaved { path: &'a Path },
    /// Image URL set complete; `total` entries will be attempted.
    ImagesDiscovered { total: usize },
    /// About to GET image `index` (1-based) of `total`.
    Downloading {
        index: usize,
        total: usize,
        url: &'a str,
        filename: &'a str,
    },
    /// Image `index` was skipped.
    DownloadFailed {
        index: usize,
        total: usize,
        url: &'a str,
        error: &'a str,
    },
}

impl Progress<'_> {
    /// One-line human-readable rendering.
    pub fn describe(&self) -> String {
        match self {
            Progress::FetchingPage { url } => format!("Loading page: {url}"),
            Progress::PageSaved { path } => format!("Saved HTML: {}", path.display()),
            Progress::ImagesDiscovered { total } => format!("Found {total} image URL(s)"),
            Progress::Downloading {
                index,
                total,
                filename,
                ..
            } => format!("[{index}/{total}] Downloading: {filename}"),
            Progress::DownloadFailed {
                index,
                total,
                url,
                error,
            } => format!("[{index}/{total}] Failed {url}: {error}"),
        }
    }
}

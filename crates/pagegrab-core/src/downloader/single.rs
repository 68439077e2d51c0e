//! One image: GET into memory, then write to its planned path.

use anyhow::{Context, Result};
use std::path::Path;

use super::DownloadRecord;
use crate::http::{self, HttpOptions};
use crate::storage;

/// GETs `url` and writes the body to `target`. Returns the manifest record.
pub fn fetch_to(url: &str, target: &Path, opts: &HttpOptions) -> Result<DownloadRecord> {
    let resp = http::get(url, opts).with_context(|| format!("GET {}", url))?;
    storage::write_file(target, &resp.body)?;

    let filename = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("target has no file name: {}", target.display()))?;
    tracing::debug!(
        url,
        path = %target.display(),
        bytes = resp.body.len(),
        content_type = resp.content_type.as_deref().unwrap_or("-"),
        "image saved"
    );

    Ok(DownloadRecord {
        url: url.to_string(),
        filename,
        path: target.display().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn unsupported_scheme_fails_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("x.png");
        let opts = HttpOptions {
            user_agent: "test".to_string(),
            timeout: Duration::from_secs(2),
            connect_timeout: Duration::from_secs(2),
        };
        assert!(fetch_to("nosuchscheme://host/x.png", &target, &opts).is_err());
        assert!(!target.exists());
    }
}

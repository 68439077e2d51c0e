use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::http::HttpOptions;

/// Browser-like User-Agent sent with every request unless overridden.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

const DEFAULT_PAGE_URL: &str = "https://ko.onepredict.ai/";
const DEFAULT_OUTPUT_DIR: &str = "img/onepredict";

/// Image URLs seen in the browser's network log for the default page but not
/// reachable from its static markup.
const DEFAULT_SUPPLEMENTARY_URLS: &[&str] = &[
    "https://ko.onepredict.ai/common/img/default_profile.png",
    "https://ko.onepredict.ai/common/img/flag_shapes/flag_kr_circle.png",
    "https://ko.onepredict.ai/common/img/flag_shapes/flag_kr_square.png",
    "https://cdn.imweb.me/upload/S2020020378cd5597b10bf/be6b22396f779.png",
    "https://cdn.imweb.me/thumbnail/20260123/e32e491137684.png",
    "https://cdn.imweb.me/thumbnail/20250715/dd0d5e742a59f.jpg",
    "https://cdn.imweb.me/thumbnail/20250115/0538e75061f1d.png",
    "https://cdn.imweb.me/thumbnail/20250124/b61a266595422.png",
    "https://cdn.imweb.me/thumbnail/20250124/a34ce61945496.png",
    "https://cdn.imweb.me/upload/S2020020378cd5597b10bf/c36ed110c5d35.jpg",
    "https://cdn.imweb.me/thumbnail/20250627/cdb3cd1f5ffa5.jpg",
    "https://cdn.imweb.me/thumbnail/20250627/eb7797b84a393.jpg",
    "https://cdn.imweb.me/thumbnail/20250627/da68b494081c5.jpg",
    "https://cdn.imweb.me/thumbnail/20250802/911161378c676.jpg",
    "https://cdn.imweb.me/upload/S2020020378cd5597b10bf/4a69957f2f9f2.jpg",
    "https://cdn.imweb.me/thumbnail/20250122/bbe699e34f6c5.jpg",
    "https://cdn.imweb.me/thumbnail/20250226/c131189dac0d5.jpg",
    "https://cdn.imweb.me/thumbnail/20250226/fd95719dde7a4.jpg",
    "https://cdn.imweb.me/thumbnail/20250109/5186a3971d52c.jpg",
    "https://cdn.imweb.me/upload/S2020020378cd5597b10bf/64b9ffdd5119a.png",
    "https://cdn.imweb.me/upload/S2020020378cd5597b10bf/b6bf63ce5fe9e.png",
    "https://cdn.imweb.me/upload/S2020020378cd5597b10bf/bf74e770cc76e.png",
    "https://cdn.imweb.me/upload/S2020020378cd5597b10bf/1085b7cd55eb4.png",
    "https://cdn.imweb.me/upload/S2020020378cd5597b10bf/f5c61ac49da5b.png",
    "https://cdn.imweb.me/thumbnail/20230111/ff80bc593f4b9.png",
    "https://cdn.imweb.me/upload/S2020020378cd5597b10bf/60b4459fdefcb.png",
    "https://cdn.imweb.me/upload/S2020020378cd5597b10bf/aec1d617891b5.png",
    "https://cdn.imweb.me/upload/S2020020378cd5597b10bf/b33f15ba1c2f6.png",
    "https://cdn.imweb.me/upload/S2020020378cd5597b10bf/b66a386bf4bc0.png",
    "https://cdn.imweb.me/thumbnail/20250715/1968d57c82740.jpg",
    "https://cdn.imweb.me/thumbnail/20250715/b9cfdcaf94e4c.png",
    "https://cdn.imweb.me/thumbnail/20250715/0bb9131f50393.png",
    "https://cdn.imweb.me/thumbnail/20251211/73d16f8a098e9.png",
    "https://cdn.imweb.me/thumbnail/20251211/dbcc9520b8f68.png",
    "https://cdn.imweb.me/thumbnail/20251022/6fb024da02921.png",
    "https://cdn.imweb.me/thumbnail/20251015/fb0be79a9dfc8.jpg",
    "https://cdn.imweb.me/thumbnail/20250915/1140f6834e239.png",
    "https://cdn.imweb.me/thumbnail/20250618/783fb1338716b.jpg",
    "https://cdn.imweb.me/thumbnail/20211101/6391fea9247d4.png",
];

/// Capture settings loaded from `~/.config/pagegrab/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Page to fetch and analyze.
    pub page_url: String,
    /// Directory receiving `page.html`, the JSON reports and the images.
    pub output_dir: PathBuf,
    /// User-Agent header sent with the page fetch and every image GET.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Whole-request timeout in seconds, per GET.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Optional connect timeout in seconds (None = same as `timeout_secs`).
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
    /// Number of anchors kept in the page structure summary.
    #[serde(default = "default_max_links")]
    pub max_links: usize,
    /// Absolute image URLs added to the discovered set as-is.
    #[serde(default)]
    pub supplementary_urls: Vec<String>,
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_links() -> usize {
    crate::extract::DEFAULT_MAX_LINKS
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            page_url: DEFAULT_PAGE_URL.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: None,
            max_links: default_max_links(),
            supplementary_urls: DEFAULT_SUPPLEMENTARY_URLS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl CaptureConfig {
    /// Rejects settings that would only fail later in the run.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.page_url)
            .with_context(|| format!("page_url is not an absolute URL: {}", self.page_url))?;
        for u in &self.supplementary_urls {
            url::Url::parse(u)
                .with_context(|| format!("supplementary URL is not absolute: {}", u))?;
        }
        if self.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be greater than zero");
        }
        Ok(())
    }

    /// Points the config at a different page.
    ///
    /// The supplementary list and output directory describe the page they were
    /// configured for, so a new page drops the list and, unless `output_dir`
    /// is given, saves to `img/<host>`. Re-targeting the same URL changes nothing.
    pub fn retarget(&mut self, page_url: &str, output_dir: Option<PathBuf>) {
        if page_url != self.page_url {
            self.page_url = page_url.to_string();
            self.supplementary_urls.clear();
            self.output_dir = output_dir_for(page_url);
        }
        if let Some(dir) = output_dir {
            self.output_dir = dir;
        }
    }

    /// Request options shared by the page fetch and the image downloads.
    pub fn http_options(&self) -> HttpOptions {
        let timeout = Duration::from_secs(self.timeout_secs);
        HttpOptions {
            user_agent: self.user_agent.clone(),
            timeout,
            connect_timeout: self
                .connect_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(timeout),
        }
    }
}

/// `img/<host>` for `page_url`, or `img/page` when it has no host.
pub fn output_dir_for(page_url: &str) -> PathBuf {
    let host = url::Url::parse(page_url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.trim_matches(['[', ']']).replace(':', "_")));
    Path::new("img").join(host.as_deref().unwrap_or("page"))
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("pagegrab")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<CaptureConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = CaptureConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from(&path)
}

/// Load configuration from an explicit file. The file must exist.
pub fn load_from(path: &Path) -> Result<CaptureConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: CaptureConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}

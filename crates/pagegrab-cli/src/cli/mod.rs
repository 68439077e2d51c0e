//! CLI for pagegrab: one capture run, progress on stdout.

use anyhow::Result;
use clap::Parser;
use pagegrab_core::capture;
use pagegrab_core::config::{self, CaptureConfig};
use std::path::PathBuf;

/// Fetch a page, download its images, and write JSON summaries.
#[derive(Debug, Parser)]
#[command(name = "pagegrab")]
#[command(about = "pagegrab: save a web page's images plus a structure summary", long_about = None)]
pub struct Cli {
    /// Read settings from this TOML file instead of ~/.config/pagegrab/config.toml.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Page to capture (overrides `page_url`). A different page drops the
    /// configured supplementary URLs and defaults the output to `img/<host>`.
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Output directory (overrides `output_dir`).
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = cli.resolve_config()?;
        tracing::debug!("loaded config: {:?}", cfg);

        let summary = capture::run(&cfg, &mut |p| println!("{}", p.describe()))?;

        println!();
        println!("Done!");
        println!("- HTML: {}", summary.html_path.display());
        println!(
            "- Images downloaded: {}/{}",
            summary.downloaded, summary.total_images
        );
        println!("- Image info: {}", summary.images_info_path.display());
        println!("- Page structure: {}", summary.page_structure_path.display());
        Ok(())
    }

    /// Loads the config file (explicit, or the XDG default) and applies overrides.
    ///
    /// Without `--config`, an unreadable XDG location falls back to built-in defaults.
    pub fn resolve_config(&self) -> Result<CaptureConfig> {
        let mut cfg = match &self.config {
            Some(path) => config::load_from(path)?,
            None => config::load_or_init().unwrap_or_else(|e| {
                tracing::warn!("using built-in defaults, config unavailable: {:#}", e);
                CaptureConfig::default()
            }),
        };
        match &self.url {
            Some(url) => cfg.retarget(url, self.output_dir.clone()),
            None => {
                if let Some(dir) = &self.output_dir {
                    cfg.output_dir = dir.clone();
                }
            }
        }
        Ok(cfg)
    }
}

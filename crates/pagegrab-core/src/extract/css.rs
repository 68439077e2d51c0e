//! `url(...)` references inside CSS text.

use once_cell::sync::Lazy;
use regex::Regex;

/// Substrings that mark a CSS reference as an image.
pub const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".svg", ".webp"];

// Quotes are optional; the captured target stops at a quote or closing paren.
static CSS_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)url\(\s*["']?([^"')]+)["']?\s*\)"#).expect("valid url() pattern")
});

/// Returns the raw targets of every `url(...)` in `css`, in order of appearance.
pub fn css_url_references(css: &str) -> Vec<&str> {
    CSS_URL_RE
        .captures_iter(css)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .collect()
}

/// True if `url` contains a known image extension anywhere (case-insensitive).
pub fn has_image_extension(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.contains(ext))
}

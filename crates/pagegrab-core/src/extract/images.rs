//! Image URL discovery across `<img>` tags, `<style>` blocks and inline styles.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use url::Url;

use super::css::{css_url_references, has_image_extension};

/// `<img>` attributes checked in priority order; the first non-empty one wins.
pub const IMG_SOURCE_ATTRIBUTES: &[&str] = &["src", "data-src", "data-lazy-src"];

static IMG_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img").expect("valid img selector"));
static STYLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("style").expect("valid style selector"));
static STYLED_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("[style]").expect("valid [style] selector"));

/// Collects every image URL referenced by `document`, resolved against `base`,
/// plus `supplementary` as-is.
pub fn image_urls_from_document(
    document: &Html,
    base: &Url,
    supplementary: &[String],
) -> BTreeSet<String> {
    let mut urls = BTreeSet::new();

    for img in document.select(&IMG_SELECTOR) {
        let src = IMG_SOURCE_ATTRIBUTES
            .iter()
            .filter_map(|name| img.value().attr(name))
            .find(|v| !v.is_empty());
        if let Some(src) = src {
            if let Some(u) = resolve(base, src) {
                urls.insert(u);
            }
        }
    }

    for style in document.select(&STYLE_SELECTOR) {
        let css: String = style.text().collect();
        insert_css_images(&mut urls, base, &css);
    }

    for el in document.select(&STYLED_SELECTOR) {
        if let Some(style) = el.value().attr("style") {
            if style.contains("background-image") {
                insert_css_images(&mut urls, base, style);
            }
        }
    }

    let discovered = urls.len();
    urls.extend(supplementary.iter().cloned());
    tracing::debug!(
        discovered,
        supplementary = supplementary.len(),
        total = urls.len(),
        "image URLs collected"
    );
    urls
}

fn insert_css_images(urls: &mut BTreeSet<String>, base: &Url, css: &str) {
    for reference in css_url_references(css) {
        if let Some(u) = resolve(base, reference) {
            if has_image_extension(&u) {
                urls.insert(u);
            }
        }
    }
}

fn resolve(base: &Url, reference: &str) -> Option<String> {
    match base.join(reference) {
        Ok(u) => Some(u.to_string()),
        Err(e) => {
            tracing::debug!(reference, "skipping unresolvable reference: {}", e);
            None
        }
    }
}

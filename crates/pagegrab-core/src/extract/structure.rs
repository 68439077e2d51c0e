//! Page structure summary: title, meta description, headings and links.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

use super::stripped_text;

/// Number of anchors kept when no explicit limit is configured.
pub const DEFAULT_MAX_LINKS: usize = 50;

static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("valid title selector"));
static META_DESCRIPTION_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"meta[name="description"]"#).expect("valid meta selector")
});
static HEADING_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("h1, h2, h3, h4, h5, h6").expect("valid heading selector")
});
static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("valid anchor selector"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// 1 through 6.
    pub level: u8,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub text: String,
    /// Raw attribute value, not resolved.
    pub href: String,
}

/// Structural digest of the page, written to `page_structure.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageStructure {
    pub title: String,
    pub meta_description: String,
    pub headings: Vec<Heading>,
    pub links: Vec<Link>,
}

/// Text of the first `<title>`, or an empty string.
pub fn page_title(document: &Html) -> String {
    document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|el| el.text().collect::<String>())
        .unwrap_or_default()
}

pub fn structure_from_document(document: &Html, max_links: usize) -> PageStructure {
    let meta_description = document
        .select(&META_DESCRIPTION_SELECTOR)
        .next()
        .and_then(|el| el.value().attr("content"))
        .unwrap_or_default()
        .to_string();

    let headings = document
        .select(&HEADING_SELECTOR)
        .filter_map(|el| {
            let level = el.value().name().strip_prefix('h')?.parse::<u8>().ok()?;
            Some(Heading {
                level,
                text: stripped_text(el),
            })
        })
        .collect();

    let links = document
        .select(&LINK_SELECTOR)
        .filter_map(|el| {
            let href = el.value().attr("href")?;
            Some(Link {
                text: stripped_text(el),
                href: href.to_string(),
            })
        })
        .take(max_links)
        .collect();

    PageStructure {
        title: page_title(document),
        meta_description,
        headings,
        links,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summarize(html: &str) -> PageStructure {
        structure_from_document(&Html::parse_document(html), DEFAULT_MAX_LINKS)
    }

    #[test]
    fn title_and_description() {
        let s = summarize(
            r#"<html><head><title>예측 정비</title>
               <meta name="description" content="Predictive maintenance">
               <meta name="keywords" content="ignored"></head></html>"#,
        );
        assert_eq!(s.title, "예측 정비");
        assert_eq!(s.meta_description, "Predictive maintenance");
    }

    #[test]
    fn missing_title_and_description_are_empty() {
        let s = summarize("<html><body><p>x</p></body></html>");
        assert_eq!(s.title, "");
        assert_eq!(s.meta_description, "");
        assert!(s.headings.is_empty());
        assert!(s.links.is_empty());
    }

    #[test]
    fn headings_in_document_order() {
        let s = summarize(
            "<h2> Second level </h2><h1>Top</h1><div><h6>Deep <em>one</em></h6></div><h3></h3>",
        );
        let got: Vec<(u8, &str)> = s.headings.iter().map(|h| (h.level, h.text.as_str())).collect();
        assert_eq!(
            got,
            vec![(2, "Second level"), (1, "Top"), (6, "Deepone"), (3, "")]
        );
    }

    #[test]
    fn links_require_href_and_keep_raw_value() {
        let s = summarize(
            r##"<a name="anchor">no href</a><a href="/about"> About us </a><a href="#top"><img src="x.png"></a>"##,
        );
        assert_eq!(
            s.links,
            vec![
                Link {
                    text: "About us".to_string(),
                    href: "/about".to_string()
                },
                Link {
                    text: String::new(),
                    href: "#top".to_string()
                },
            ]
        );
    }

    #[test]
    fn links_capped() {
        let html: String = (0..60).map(|i| format!("<a href=\"/p{i}\">p{i}</a>")).collect();
        let doc = Html::parse_document(&html);
        assert_eq!(structure_from_document(&doc, DEFAULT_MAX_LINKS).links.len(), 50);
        let s = structure_from_document(&doc, 3);
        assert_eq!(s.links.len(), 3);
        assert_eq!(s.links[2].href, "/p2");
    }
}

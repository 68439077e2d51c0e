//! Path extraction from image URLs.

/// Returns the (still percent-encoded) path of `url`.
///
/// Falls back to the text after the authority when `url` does not parse, so
/// filename derivation never fails outright.
pub fn url_path(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => {
            let rest = url.split_once("://").map(|(_, r)| r).unwrap_or(url);
            let rest = rest.split(['?', '#']).next().unwrap_or("");
            match rest.find('/') {
                Some(i) => rest[i..].to_string(),
                None => String::new(),
            }
        }
    }
}

/// Text after the last `/` of `path` (empty for `"/"` or a trailing slash).
pub fn last_path_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or("")
}

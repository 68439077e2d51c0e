//! Pick metadata out of collected response header lines.

/// Returns the `Content-Type` of the last response in `lines`.
///
/// With redirects, curl reports one header block per hop; each block starts
/// with an `HTTP/` status line, so earlier values are discarded there.
pub(crate) fn final_content_type(lines: &[String]) -> Option<String> {
    let mut content_type = None;
    for line in lines {
        let line = line.trim();
        if line.starts_with("HTTP/") {
            content_type = None;
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-type") {
                content_type = Some(value.trim().to_string());
            }
        }
    }
    content_type
}

/// Returns the `charset` parameter of a `Content-Type` value, unquoted.
pub(crate) fn charset_param(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let value = value.trim().trim_matches('"').trim();
        (!value.is_empty()).then_some(value)
    })
}

//! Filesystem-safe filename sanitization.

/// Linux NAME_MAX.
pub const NAME_MAX: usize = 255;

/// Makes a path segment safe to use as a single filename.
///
/// - Replaces NUL, `/`, `\`, and control characters with `_`
/// - Limits length to 255 bytes, cutting on a char boundary
///
/// Everything else is left as-is so names match the URL they came from.
pub fn sanitize_filename(name: &str) -> String {
    let out: String = name
        .chars()
        .map(|c| {
            if c == '\0' || c == '/' || c == '\\' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    truncate_to_boundary(&out, NAME_MAX).to_string()
}

/// Longest prefix of `s` that fits in `max` bytes without splitting a char.
pub fn truncate_to_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut take = max;
    while take > 0 && !s.is_char_boundary(take) {
        take -= 1;
    }
    &s[..take]
}

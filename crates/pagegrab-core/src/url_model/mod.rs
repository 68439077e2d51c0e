//! URL modeling and filename derivation.
//!
//! Derives local image filenames from the URL path, falling back to a short
//! hash of the URL when the path does not end in a name with an extension.

mod path;
mod sanitize;

pub use path::{last_path_segment, url_path};
pub use sanitize::{sanitize_filename, truncate_to_boundary, NAME_MAX};

use sha2::{Digest, Sha256};

/// Length of the hex identifier used for generated names.
const HASH_NAME_LEN: usize = 8;

/// Derives the filename an image is saved under.
///
/// Uses the final segment of the URL path when it contains a `.`. Otherwise
/// generates `<8 hex chars><ext>` from a hash of the URL string, so the same
/// URL always yields the same name.
///
/// # Examples
///
/// - `derive_image_filename("https://cdn.test/thumb/pic.jpg")` → `"pic.jpg"`
/// - `derive_image_filename("https://cdn.test/images/render")` → `"<hash>.jpg"`
pub fn derive_image_filename(url: &str) -> String {
    let path = url_path(url);
    let segment = last_path_segment(&path);
    let sanitized = sanitize_filename(segment);
    if !sanitized.is_empty() && sanitized.contains('.') && sanitized != "." && sanitized != ".." {
        return sanitized;
    }
    format!("{}{}", hash_name(url), guess_extension(&path))
}

/// First 8 hex chars of SHA-256 over the URL string.
pub fn hash_name(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    let mut name = hex::encode(digest);
    name.truncate(HASH_NAME_LEN);
    name
}

/// Extension for a generated name, sniffed from substrings of the URL path.
///
/// Paths mentioning `image` are checked for `.png`, `.gif`, `.svg` in that
/// order; everything else is saved as `.jpg`.
fn guess_extension(path: &str) -> &'static str {
    let lower = path.to_ascii_lowercase();
    if !lower.contains("image") {
        return ".jpg";
    }
    [".png", ".gif", ".svg"]
        .into_iter()
        .find(|ext| lower.contains(ext))
        .unwrap_or(".jpg")
}

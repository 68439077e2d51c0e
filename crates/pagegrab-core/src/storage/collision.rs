//! Counter-suffixed names for targets that already exist.

use std::path::{Path, PathBuf};

use crate::url_model::{truncate_to_boundary, NAME_MAX};

/// Splits `name` into stem and extension at the last `.`.
///
/// A leading dot does not start an extension (`.hidden` has none).
/// The returned extension includes the dot.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(i) if name[..i].chars().any(|c| c != '.') => name.split_at(i),
        _ => (name, ""),
    }
}

/// Returns `dir/filename`, or the first free `dir/<stem>_<n><ext>` for n = 1, 2, ...
///
/// Names in `reserved` count as taken even when absent on disk. The stem is
/// shortened so a suffixed name stays within NAME_MAX bytes.
///
/// Check-then-use: the caller must not race other writers for the same dir.
pub fn resolve_collision(dir: &Path, filename: &str, reserved: &[&str]) -> PathBuf {
    let taken = |name: &str| reserved.contains(&name) || dir.join(name).exists();
    if !taken(filename) {
        return dir.join(filename);
    }
    let (stem, ext) = match split_extension(filename) {
        (stem, ext) if ext.len() < NAME_MAX / 2 => (stem, ext),
        _ => (filename, ""),
    };
    let mut counter: u64 = 1;
    loop {
        let suffix = format!("_{counter}{ext}");
        let stem = truncate_to_boundary(stem, NAME_MAX - suffix.len());
        let name = format!("{stem}{suffix}");
        if !taken(&name) {
            return dir.join(name);
        }
        counter += 1;
    }
}

//! Request path normalization.

/// Strip query string, fragment and leading slashes.
///
/// `"/drivers?page=2"` and `"drivers"` both normalize to `"drivers"`; the
/// application root normalizes to `""`.
pub fn normalize_path(path: &str) -> &str {
    let path = path.trim();
    let end = path.find(['?', '#']).unwrap_or(path.len());
    path[..end].trim_start_matches('/')
}

pub fn is_root_path(path: &str) -> bool {
    normalize_path(path).is_empty()
}

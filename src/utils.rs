// Path helpers extracted for testing

use std::path::{MAIN_SEPARATOR, MAIN_SEPARATOR_STR};

/// Normalizes a remote directory to end with exactly one trailing slash,
/// the form the server expects for a change-directory request.
pub fn ensure_trailing_slash(dir: &str) -> String {
    format!("{}/", dir.trim_end_matches('/'))
}

/// Rewrites both slash conventions to the host platform's separator.
pub fn localize_separators(path: &str) -> String {
    path.replace(['/', '\\'], MAIN_SEPARATOR_STR)
}

/// Appends the platform separator to a non-empty local base directory.
pub fn ensure_trailing_local_sep(dir: &str) -> String {
    if dir.is_empty() || dir.ends_with(MAIN_SEPARATOR) {
        dir.to_string()
    } else {
        format!("{dir}{MAIN_SEPARATOR}")
    }
}

/// Splits a remote file path into directory and basename at the last
/// platform separator. Remote paths are expected to already use the host's
/// separator convention.
pub fn split_remote_path(path: &str) -> (Option<&str>, &str) {
    match path.rfind(MAIN_SEPARATOR) {
        Some(pos) => (Some(&path[..pos]), &path[pos + 1..]),
        None => (None, path),
    }
}

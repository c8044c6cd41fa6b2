//! chrome:// URI resolution against the source tree.
//!
//! `chrome://package/locale/path` registrations live in `jar.mn` manifests,
//! but for in-tree layouts the registered file is always the matching path
//! under some `en-US` localization directory. Resolution is a suffix scan
//! over those directories, narrowed by the package name when more than one
//! file matches.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Candidate `en-US` files for a `chrome://pkg/locale/…` URI. Empty when the
/// URI is not a locale URI or nothing under `root` matches; multiple entries
/// mean the URI is ambiguous and the caller should not guess.
pub fn resolve_chrome_uri(root: &Path, uri: &str) -> Vec<PathBuf> {
    let Some(rest) = uri.strip_prefix("chrome://") else {
        return Vec::new();
    };
    let mut parts = rest.splitn(3, '/');
    let (Some(pkg), Some(provider), Some(rel)) = (parts.next(), parts.next(), parts.next())
    else {
        return Vec::new();
    };
    // Locale files live under en-US; content files never do.
    let needs_locale = match provider {
        "locale" => true,
        "content" => false,
        _ => return Vec::new(),
    };

    let mut candidates: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.components().any(|c| c.as_os_str() == "en-US") == needs_locale && has_suffix(p, rel)
        })
        .collect();

    if candidates.len() > 1 {
        let named: Vec<PathBuf> = candidates
            .iter()
            .filter(|p| p.components().any(|c| c.as_os_str() == pkg))
            .cloned()
            .collect();
        if !named.is_empty() {
            candidates = named;
        }
    }
    candidates.sort();
    candidates.dedup();
    candidates
}

fn has_suffix(path: &Path, rel: &str) -> bool {
    let mut path_parts = path.components().rev();
    rel.rsplit('/')
        .all(|part| path_parts.next().is_some_and(|c| c.as_os_str() == part))
}

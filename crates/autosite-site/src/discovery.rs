//! Page discovery by glob expansion.

use std::path::{Component, Path, PathBuf};

use crate::error::SiteError;

/// Marker left by editors for in-progress saves (e.g. `.#foo.tmpl`).
const EDITOR_LOCK_MARKER: &str = ".#";

/// Find page files matching `pattern` under `base_dir`.
///
/// Returned paths are relative to `base_dir`, use `/` separators, and follow
/// glob expansion order. Paths containing `.#` are skipped.
///
/// # Errors
///
/// Returns [`SiteError::Pattern`] for an invalid pattern, [`SiteError::Glob`]
/// if an entry cannot be read, and [`SiteError::NoPages`] if nothing usable
/// matched.
pub fn get_files(base_dir: &Path, pattern: &str) -> Result<Vec<String>, SiteError> {
    let full_pattern = glob_under(base_dir, pattern)?;
    let entries = glob::glob(&full_pattern).map_err(|source| SiteError::Pattern {
        pattern: pattern.to_owned(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = relative_path(base_dir, &entry?)?;
        if path.contains(EDITOR_LOCK_MARKER) {
            tracing::debug!(path = %path, "Skipping editor lock file");
            continue;
        }
        files.push(path);
    }

    if files.is_empty() {
        return Err(SiteError::NoPages(pattern.to_owned()));
    }
    Ok(files)
}

/// Prefix `pattern` with the escaped base directory.
fn glob_under(base_dir: &Path, pattern: &str) -> Result<String, SiteError> {
    let base = base_dir
        .to_str()
        .ok_or_else(|| SiteError::NonUtf8Path(base_dir.to_path_buf()))?;
    let full = Path::new(&glob::Pattern::escape(base)).join(pattern);
    full.to_str()
        .map(str::to_owned)
        .ok_or(SiteError::NonUtf8Path(full))
}

/// Render `path` relative to `base_dir` with `/` separators.
fn relative_path(base_dir: &Path, path: &Path) -> Result<String, SiteError> {
    let relative = path.strip_prefix(base_dir).unwrap_or(path);
    let segments = relative
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| SiteError::NonUtf8Path(PathBuf::from(path)))?;
    Ok(segments.join("/"))
}

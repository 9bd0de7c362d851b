use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{Error, Result};

/// A discovered manual page.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Path relative to the corpus root, always `/`-separated.
    pub relative_path: String,
    /// Fully resolved absolute path.
    pub absolute_path: PathBuf,
}

/// Directories holding assets or generated navigation, never content.
pub const SKIP_DIRS: &[&str] = &["_static", "_images", "_sources"];

/// Pages that exist in every Sphinx build but carry no manual content.
pub const SKIP_FILES: &[&str] = &[
    "genindex.html",
    "search.html",
    "versions.html",
    "copyright.html",
    "404.html",
    "changelog.html",
];

/// Recursively walk the corpus root and collect its HTML pages.
///
/// Results are sorted by relative path so repeated runs over the same
/// tree visit pages in the same order. A missing root or an unreadable
/// directory aborts the walk; entries whose type cannot be determined are
/// skipped with a warning.
pub fn discover_html_files(root: &Path) -> Result<Vec<DiscoveredFile>> {
    if !root.is_dir() {
        return Err(Error::CorpusRoot(root.to_path_buf()));
    }
    let canonical_root = root.canonicalize()?;
    let mut results = Vec::new();
    walk_dir(&canonical_root, &canonical_root, &mut results)?;
    results.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    Ok(results)
}

fn walk_dir(
    root: &Path,
    current: &Path,
    results: &mut Vec<DiscoveredFile>,
) -> Result<()> {
    let entries = std::fs::read_dir(current)?;

    for entry in entries {
        let entry = entry?;
        let file_name = entry.file_name();
        let name = file_name.to_string_lossy();

        if SKIP_DIRS.contains(&name.as_ref()) {
            continue;
        }

        let file_type = match entry.file_type() {
            Ok(t) => t,
            Err(e) => {
                warn!(path = %entry.path().display(), "skipping entry: {e}");
                continue;
            }
        };

        if file_type.is_dir() {
            walk_dir(root, &entry.path(), results)?;
        } else if file_type.is_file()
            && is_content_page(&name)
            && let Some(df) = make_discovered(root, &entry.path())
        {
            results.push(df);
        }
    }

    Ok(())
}

fn is_content_page(name: &str) -> bool {
    name.ends_with(".html") && !SKIP_FILES.contains(&name)
}

fn make_discovered(root: &Path, path: &Path) -> Option<DiscoveredFile> {
    let relative = path.strip_prefix(root).ok()?;
    Some(DiscoveredFile {
        relative_path: to_forward_slashes(relative),
        absolute_path: path.to_path_buf(),
    })
}

/// Join a relative path's components with `/` regardless of platform.
pub fn to_forward_slashes(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

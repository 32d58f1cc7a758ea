//! Filesystem connector: discovers documentation files under a root.
//!
//! Walks the tree with `walkdir`, keeps files matching the include globs,
//! and reads each one. Unreadable files and walk errors are logged and
//! skipped so a single bad entry never aborts a scan.

use anyhow::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::IngestConfig;

/// Path segment marking a dependency cache; anything below it is skipped.
const DEPENDENCY_CACHE_MARKER: &str = "node_modules";

/// A documentation file read from disk.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Path relative to the scan root, using the OS path separator.
    pub relative_path: String,
    pub body: String,
}

/// Scan `root` for documentation files.
///
/// Errors only on invalid glob patterns; filesystem problems are per-entry
/// warnings.
pub fn scan_documents(root: &Path, config: &IngestConfig) -> Result<Vec<SourceFile>> {
    let include_set = build_globset(&config.include_globs)?;
    let exclude_set = build_globset(&config.exclude_globs)?;

    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(config.follow_symlinks) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        let rel_str = relative.to_string_lossy().to_string();

        if is_skipped(path, &rel_str) {
            debug!(path = %rel_str, "skipping hidden or dependency-cache file");
            continue;
        }
        if exclude_set.is_match(&rel_str) || !include_set.is_match(&rel_str) {
            continue;
        }

        match std::fs::read_to_string(path) {
            Ok(body) => files.push(SourceFile {
                path: path.to_path_buf(),
                relative_path: rel_str,
                body,
            }),
            Err(e) => warn!(path = %path.display(), error = %e, "failed to read document, skipping"),
        }
    }

    // Sort for deterministic ordering
    files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

    Ok(files)
}

fn is_skipped(path: &Path, relative: &str) -> bool {
    let hidden = path
        .file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(false);
    hidden || relative.contains(DEPENDENCY_CACHE_MARKER)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

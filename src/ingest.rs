//! Document ingestion: filesystem tree → chunked, classified record drafts.
//!
//! Coordinates connector → chunking → classification. Each chunk is
//! classified on its own text, so parts of one document may land in
//! different phases. Per-file failures are non-fatal.

use anyhow::Result;
use std::path::Path;
use tracing::{error, info};

use crate::chunk;
use crate::classify::{classify_phase, extract_tags};
use crate::config::Config;
use crate::connector_fs;
use crate::models::RecordDraft;

/// Ingest every documentation file under `root`.
///
/// A missing root yields an empty result (logged), never an error.
pub fn ingest(root: &Path, config: &Config) -> Result<Vec<RecordDraft>> {
    if !root.exists() {
        error!(path = %root.display(), "documentation path not found");
        return Ok(Vec::new());
    }

    info!(path = %root.display(), "processing documentation");
    let files = connector_fs::scan_documents(root, &config.ingest)?;

    let mut drafts = Vec::new();
    for file in &files {
        let title = title_from_path(&file.path);
        drafts.extend(drafts_from_document(
            &title,
            &file.body,
            &file.relative_path,
            config.chunking.max_chars,
        ));
    }

    info!(files = files.len(), records = drafts.len(), "processed documentation");
    Ok(drafts)
}

/// Chunk one document and classify each chunk.
///
/// Multi-chunk documents get `"<title> - Part N"` titles (1-based).
pub fn drafts_from_document(
    title: &str,
    body: &str,
    source: &str,
    max_chars: usize,
) -> Vec<RecordDraft> {
    let segments = chunk::split(body, max_chars);
    let multi = segments.len() > 1;

    segments
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let chunk_title = if multi {
                format!("{} - Part {}", title, i + 1)
            } else {
                title.to_string()
            };
            let phase = classify_phase(&text);
            let tags = extract_tags(&text);
            RecordDraft::new(chunk_title, text, phase, tags, source)
        })
        .collect()
}

/// Human title from a file name: stem, separators to spaces, title case.
pub fn title_from_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    title_case(&stem.replace(['-', '_'], " "))
}

/// Upper-case the first letter of each alphabetic run, lower-case the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

//! Embed record drafts and write them to the store.
//!
//! Embedding is serial, one draft at a time. A draft whose embedding fails,
//! or comes back with a length other than [`Embedder::dims`], is logged and
//! skipped; the rest go to the store in a single upsert.

use tracing::{info, warn};

use crate::embedding::Embedder;
use crate::models::{Record, RecordDraft};
use crate::store::{KnowledgeStore, VectorStore};

/// Outcome of one upload run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadReport {
    /// Records written to the store.
    pub uploaded: usize,
    /// Drafts dropped because their embedding failed or had the wrong size.
    pub skipped: usize,
    /// The store accepted the batch, or the input was empty.
    pub stored: bool,
}

/// Embed `drafts` and upsert the successful ones into `collection`.
pub async fn upload_records<S, E>(
    store: &KnowledgeStore<S>,
    embedder: &E,
    collection: &str,
    drafts: Vec<RecordDraft>,
) -> UploadReport
where
    S: VectorStore,
    E: Embedder + ?Sized,
{
    let dims = embedder.dims();
    info!(
        count = drafts.len(),
        collection,
        model = embedder.model_name(),
        dims,
        "uploading records"
    );

    let mut records = Vec::with_capacity(drafts.len());
    let mut skipped = 0usize;

    for draft in drafts {
        match embedder.embed(&draft.content).await {
            Ok(vector) if vector.len() == dims => {
                records.push(Record::from_draft(draft, vector))
            }
            Ok(vector) => {
                warn!(
                    title = %draft.title,
                    expected = dims,
                    got = vector.len(),
                    "embedding has wrong dimension, skipping record"
                );
                skipped += 1;
            }
            Err(e) => {
                warn!(title = %draft.title, error = %format!("{:#}", e), "embedding failed, skipping record");
                skipped += 1;
            }
        }
    }

    if records.is_empty() {
        warn!(skipped, "no records to upload");
        return UploadReport {
            uploaded: 0,
            skipped,
            stored: skipped == 0,
        };
    }

    let stored = store.upsert(collection, &records).await;
    let uploaded = if stored { records.len() } else { 0 };
    if stored {
        info!(uploaded, skipped, "upload complete");
    }

    UploadReport {
        uploaded,
        skipped,
        stored,
    }
}

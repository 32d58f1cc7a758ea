//! End-to-end pipeline tests: ingest → embed → upsert → search, run
//! against the in-memory backend with a deterministic embedder.

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

use event_kb::config::Config;
use event_kb::embedding::Embedder;
use event_kb::ingest::ingest;
use event_kb::models::{Phase, RecordDraft, Role};
use event_kb::samples::sample_articles;
use event_kb::search::QueryService;
use event_kb::store::memory::InMemoryStore;
use event_kb::store::qdrant::QdrantStore;
use event_kb::store::{Distance, KnowledgeStore, SearchFilter};
use event_kb::upload::upload_records;

const COLLECTION: &str = "event-kb-test";

/// Word counts over a fixed vocabulary. Texts containing `FAIL` cannot be
/// embedded.
struct VocabEmbedder;

const VOCAB: [&str; 12] = [
    "refund",
    "stripe",
    "payment",
    "whatsapp",
    "marketing",
    "sponsor",
    "ticket",
    "event",
    "checklist",
    "operations",
    "broadcast",
    "dashboard",
];

#[async_trait]
impl Embedder for VocabEmbedder {
    fn model_name(&self) -> &str {
        "vocab-test"
    }

    fn dims(&self) -> usize {
        VOCAB.len()
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.contains("FAIL") {
            bail!("embedding service rejected input");
        }
        let mut vector = vec![0.0f32; VOCAB.len()];
        let lower = text.to_lowercase();
        for token in lower.split(|c: char| !c.is_alphanumeric()) {
            if let Some(i) = VOCAB.iter().position(|w| *w == token) {
                vector[i] += 1.0;
            }
        }
        Ok(vector)
    }
}

fn draft(title: &str, content: &str, phase: Phase, roles: &[Role]) -> RecordDraft {
    RecordDraft {
        roles: roles.to_vec(),
        ..RecordDraft::new(title, content, phase, Vec::new(), "test")
    }
}

async fn fresh_store() -> KnowledgeStore<InMemoryStore> {
    let kb = KnowledgeStore::new(InMemoryStore::new());
    assert!(
        kb.create_collection(COLLECTION, VOCAB.len(), Distance::Cosine)
            .await
    );
    kb
}

fn stripe_guide() -> String {
    let para = "Stripe payment webhooks confirm each charge. "
        .repeat(8)
        .trim_end()
        .to_string();
    format!(
        "# Stripe Payments Guide\n\n{}",
        vec![para; 4].join("\n\n")
    )
}

#[test]
fn test_ingest_long_stripe_document() {
    let tmp = TempDir::new().unwrap();
    let body = stripe_guide();
    let len = body.chars().count();
    assert!(len > 1400 && len < 1600, "length {}", len);
    fs::write(tmp.path().join("stripe-payments.md"), &body).unwrap();

    let drafts = ingest(tmp.path(), &Config::default()).unwrap();

    assert_eq!(drafts.len(), 2);
    assert_eq!(drafts[0].title, "Stripe Payments - Part 1");
    assert_eq!(drafts[1].title, "Stripe Payments - Part 2");
    for d in &drafts {
        assert_eq!(d.phase, Phase::Ticketing);
        assert_eq!(d.tags, vec!["stripe".to_string()]);
        assert_eq!(d.roles, vec![Role::Organizer]);
        assert_eq!(d.source, "stripe-payments.md");
        assert!(d.content.chars().count() <= 800);
    }
}

#[test]
fn test_ingest_skips_non_markdown_and_hidden_files() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("guides")).unwrap();
    fs::create_dir_all(tmp.path().join("node_modules/pkg")).unwrap();
    fs::write(
        tmp.path().join("guides/whatsapp-campaigns.md"),
        "Schedule WhatsApp broadcast messages before launch.",
    )
    .unwrap();
    fs::write(tmp.path().join("notes.txt"), "ticket checkout notes").unwrap();
    fs::write(tmp.path().join(".draft.md"), "ticket draft").unwrap();
    fs::write(tmp.path().join("node_modules/pkg/README.md"), "ticket").unwrap();

    let drafts = ingest(tmp.path(), &Config::default()).unwrap();

    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].title, "Whatsapp Campaigns");
    assert_eq!(drafts[0].phase, Phase::Marketing);
    assert_eq!(drafts[0].tags, vec!["whatsapp".to_string()]);
}

#[test]
fn test_ingest_skips_unreadable_file() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("good.md"), "Ticket checkout flow.").unwrap();
    // Invalid UTF-8 cannot be read as text.
    fs::write(tmp.path().join("broken.md"), [0xff, 0xfe, 0xfd]).unwrap();

    let drafts = ingest(tmp.path(), &Config::default()).unwrap();

    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].title, "Good");
}

#[test]
fn test_ingest_missing_directory_is_empty() {
    let tmp = TempDir::new().unwrap();
    let drafts = ingest(&tmp.path().join("does-not-exist"), &Config::default()).unwrap();
    assert!(drafts.is_empty());
}

#[tokio::test]
async fn test_upload_then_refund_query_ranks_stripe_first() {
    let kb = fresh_store().await;
    let drafts = vec![
        draft(
            "Stripe Refunds",
            "Stripe refund handling. Issue a refund from the Stripe dashboard.",
            Phase::Ticketing,
            &[Role::Finance],
        ),
        draft(
            "WhatsApp Broadcasts",
            "WhatsApp marketing broadcast messages.",
            Phase::Marketing,
            &[Role::Marketing],
        ),
    ];

    let report = upload_records(&kb, &VocabEmbedder, COLLECTION, drafts).await;
    assert_eq!(report.uploaded, 2);
    assert_eq!(report.skipped, 0);
    assert!(report.stored);
    assert_eq!(kb.backend().len(COLLECTION), 2);

    let service = QueryService::new(&kb, &VocabEmbedder, COLLECTION);
    let results = service.search_kb("refund", 2, None, None).await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].title, "Stripe Refunds");
    assert_eq!(results[1].title, "WhatsApp Broadcasts");
    assert!(results[0].score > results[1].score);
}

#[tokio::test]
async fn test_failed_embedding_is_skipped() {
    let kb = fresh_store().await;
    let drafts = vec![
        draft("Good", "ticket event", Phase::Ticketing, &[Role::Organizer]),
        draft("Bad", "FAIL ticket", Phase::Ticketing, &[Role::Organizer]),
    ];

    let report = upload_records(&kb, &VocabEmbedder, COLLECTION, drafts).await;

    assert_eq!(report.uploaded, 1);
    assert_eq!(report.skipped, 1);
    assert!(report.stored);
    assert_eq!(kb.backend().len(COLLECTION), 1);
}

#[tokio::test]
async fn test_upload_into_missing_collection_reports_failure() {
    let kb = KnowledgeStore::new(InMemoryStore::new());
    let report = upload_records(&kb, &VocabEmbedder, "nope", sample_articles()).await;
    assert_eq!(report.uploaded, 0);
    assert!(!report.stored);
}

#[tokio::test]
async fn test_recreate_collection_changes_dims_and_drops_points() {
    let kb = KnowledgeStore::new(InMemoryStore::new());
    assert!(kb.create_collection(COLLECTION, 4, Distance::Cosine).await);

    let report = upload_records(
        &kb,
        &FixedEmbedder(vec![1.0, 0.0, 0.0, 0.0]),
        COLLECTION,
        vec![draft("A", "a", Phase::Inception, &[Role::Organizer])],
    )
    .await;
    assert_eq!(report.uploaded, 1);

    assert!(kb.create_collection(COLLECTION, 8, Distance::Cosine).await);
    assert_eq!(kb.backend().dims(COLLECTION), Some(8));
    assert!(kb.backend().is_empty(COLLECTION));

    // Old-dimension vectors no longer fit.
    let report = upload_records(
        &kb,
        &FixedEmbedder(vec![1.0, 0.0, 0.0, 0.0]),
        COLLECTION,
        vec![draft("B", "b", Phase::Inception, &[Role::Organizer])],
    )
    .await;
    assert!(!report.stored);
    assert!(kb.backend().is_empty(COLLECTION));
}

struct FixedEmbedder(Vec<f32>);

#[async_trait]
impl Embedder for FixedEmbedder {
    fn model_name(&self) -> &str {
        "fixed"
    }

    fn dims(&self) -> usize {
        self.0.len()
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(self.0.clone())
    }
}

/// Claims `dims` but returns shorter vectors for texts mentioning `short`.
struct Misreporting {
    dims: usize,
}

#[async_trait]
impl Embedder for Misreporting {
    fn model_name(&self) -> &str {
        "misreporting"
    }

    fn dims(&self) -> usize {
        self.dims
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let len = if text.contains("short") {
            self.dims - 1
        } else {
            self.dims
        };
        Ok(vec![0.5; len])
    }
}

#[tokio::test]
async fn test_wrong_sized_embedding_is_skipped() {
    let kb = KnowledgeStore::new(InMemoryStore::new());
    assert!(kb.create_collection(COLLECTION, 4, Distance::Cosine).await);

    let report = upload_records(
        &kb,
        &Misreporting { dims: 4 },
        COLLECTION,
        vec![
            draft("Full", "full vector", Phase::Inception, &[Role::Organizer]),
            draft("Short", "short vector", Phase::Inception, &[Role::Organizer]),
        ],
    )
    .await;

    assert_eq!(report.uploaded, 1);
    assert_eq!(report.skipped, 1);
    assert!(report.stored);
    assert_eq!(kb.backend().len(COLLECTION), 1);
}

#[tokio::test]
async fn test_filters_never_return_non_matching_records() {
    let kb = fresh_store().await;
    let report = upload_records(&kb, &VocabEmbedder, COLLECTION, sample_articles()).await;
    assert_eq!(report.uploaded, 5);

    let service = QueryService::new(&kb, &VocabEmbedder, COLLECTION);
    for phase in Phase::ALL {
        for role in Role::ALL {
            let results = service
                .search_kb("stripe payment event", 10, Some(phase), Some(role))
                .await;
            for r in &results {
                assert_eq!(r.phase, phase);
                assert!(r.roles.contains(&role), "{:?} lacks {:?}", r.roles, role);
            }
        }
    }

    let finance_ticketing = service
        .search_kb("stripe payment", 10, Some(Phase::Ticketing), Some(Role::Finance))
        .await;
    assert_eq!(finance_ticketing.len(), 1);
    assert_eq!(
        finance_ticketing[0].title,
        "Stripe Connect Setup for Event Payments"
    );

    let ops = service
        .search_kb("checklist", 10, None, Some(Role::Operations))
        .await;
    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0].phase, Phase::LiveEvent);
}

#[tokio::test]
async fn test_limit_handling() {
    let kb = fresh_store().await;
    upload_records(&kb, &VocabEmbedder, COLLECTION, sample_articles()).await;
    let service = QueryService::new(&kb, &VocabEmbedder, COLLECTION);

    assert!(service.search_kb("stripe", 0, None, None).await.is_empty());
    assert!(service.search_kb("stripe", -3, None, None).await.is_empty());
    assert_eq!(service.search_kb("stripe", 2, None, None).await.len(), 2);
    assert_eq!(service.search_kb("stripe", 50, None, None).await.len(), 5);
}

#[tokio::test]
async fn test_empty_query_is_still_searched() {
    let kb = fresh_store().await;
    upload_records(&kb, &VocabEmbedder, COLLECTION, sample_articles()).await;
    let service = QueryService::new(&kb, &VocabEmbedder, COLLECTION);

    let results = service.search_kb("", 3, None, None).await;
    assert_eq!(results.len(), 3);
}

#[tokio::test]
async fn test_query_embedding_failure_is_empty() {
    let kb = fresh_store().await;
    upload_records(&kb, &VocabEmbedder, COLLECTION, sample_articles()).await;
    let service = QueryService::new(&kb, &VocabEmbedder, COLLECTION);

    assert!(service.search_kb("FAIL", 3, None, None).await.is_empty());
}

#[tokio::test]
async fn test_run_test_queries_returns_one_list_per_query() {
    let kb = fresh_store().await;
    upload_records(&kb, &VocabEmbedder, COLLECTION, sample_articles()).await;
    let service = QueryService::new(&kb, &VocabEmbedder, COLLECTION);

    let all = service.run_test_queries().await;
    assert_eq!(all.len(), 5);
    for results in &all {
        assert!(results.len() <= 3);
    }
    // Unfiltered refund query sees the whole collection.
    assert_eq!(all[0].len(), 3);
}

#[tokio::test]
async fn test_unreachable_qdrant_degrades_gracefully() {
    let backend =
        QdrantStore::new("http://127.0.0.1:1", "secret", Duration::from_secs(2)).unwrap();
    let kb = KnowledgeStore::new(backend);

    assert!(!kb.create_collection(COLLECTION, 12, Distance::Cosine).await);

    let report = upload_records(&kb, &VocabEmbedder, COLLECTION, sample_articles()).await;
    assert_eq!(report.uploaded, 0);
    assert!(!report.stored);

    let service = QueryService::new(&kb, &VocabEmbedder, COLLECTION);
    assert!(service
        .search_kb("refund", 5, Some(Phase::Ticketing), None)
        .await
        .is_empty());

    let raw = kb
        .search(COLLECTION, &[0.0; 12], 5, &SearchFilter::default())
        .await;
    assert!(raw.is_empty());
}

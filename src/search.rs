//! Query service: natural-language search over the knowledge base.
//!
//! Embeds the query, builds the metadata filter and delegates to the
//! [`KnowledgeStore`]. A query never fails: embedding or store problems
//! produce an empty result list.

use tracing::warn;

use crate::embedding::Embedder;
use crate::models::{Phase, Role, SearchResult};
use crate::store::{KnowledgeStore, SearchFilter, VectorStore};

/// Default number of results for [`QueryService::search_kb`] callers.
pub const DEFAULT_LIMIT: i64 = 5;

/// Queries run by `--test`: (query, phase filter, role filter).
pub const TEST_QUERIES: [(&str, Option<Phase>, Option<Role>); 5] = [
    ("How do I handle ticket refunds?", None, None),
    (
        "What's the best way to track sponsor ROI?",
        Some(Phase::Sponsorships),
        Some(Role::Finance),
    ),
    (
        "How to automate WhatsApp marketing?",
        Some(Phase::Marketing),
        Some(Role::Marketing),
    ),
    (
        "Event day operations checklist",
        Some(Phase::LiveEvent),
        Some(Role::Operations),
    ),
    (
        "Stripe payment integration",
        Some(Phase::Ticketing),
        Some(Role::Finance),
    ),
];

/// Search front-end bound to one collection.
pub struct QueryService<'a, S, E: ?Sized> {
    store: &'a KnowledgeStore<S>,
    embedder: &'a E,
    collection: &'a str,
}

impl<'a, S, E> QueryService<'a, S, E>
where
    S: VectorStore,
    E: Embedder + ?Sized,
{
    pub fn new(store: &'a KnowledgeStore<S>, embedder: &'a E, collection: &'a str) -> Self {
        Self {
            store,
            embedder,
            collection,
        }
    }

    /// Ranked results for `query`, optionally restricted to a phase and/or role.
    ///
    /// `limit <= 0` returns nothing. Empty query text is still embedded.
    pub async fn search_kb(
        &self,
        query: &str,
        limit: i64,
        phase: Option<Phase>,
        role: Option<Role>,
    ) -> Vec<SearchResult> {
        if limit <= 0 {
            return Vec::new();
        }

        let query_vec = match self.embedder.embed(query).await {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %format!("{:#}", e), "query embedding failed");
                return Vec::new();
            }
        };

        let filter = SearchFilter::new(phase, role);
        self.store
            .search(self.collection, &query_vec, limit as usize, &filter)
            .await
            .into_iter()
            .map(|hit| SearchResult {
                id: hit.id,
                title: hit.payload.title,
                content: hit.payload.content,
                phase: hit.payload.phase,
                tags: hit.payload.tags,
                roles: hit.payload.roles,
                score: hit.score,
            })
            .collect()
    }

    /// Run [`TEST_QUERIES`] (limit 3 each) and print a ranked summary.
    pub async fn run_test_queries(&self) -> Vec<Vec<SearchResult>> {
        println!("\nTesting search functionality...");
        println!("{}", "=".repeat(50));

        let mut all = Vec::with_capacity(TEST_QUERIES.len());
        for (query, phase, role) in TEST_QUERIES {
            println!("\nQuery: {}", query);
            if let Some(p) = phase {
                println!("   Phase: {}", p);
            }
            if let Some(r) = role {
                println!("   Role: {}", r);
            }

            let results = self.search_kb(query, 3, phase, role).await;
            print_results(&results);
            all.push(results);
        }

        println!("\nSearch testing completed.");
        all
    }
}

/// Print results as a numbered list with score, phase and tags.
pub fn print_results(results: &[SearchResult]) {
    if results.is_empty() {
        println!("   No results found");
        return;
    }
    for (i, result) in results.iter().enumerate() {
        println!("   {}. {} (Score: {:.3})", i + 1, result.title, result.score);
        println!(
            "      Phase: {} | Tags: {}",
            result.phase,
            result.tags.join(", ")
        );
    }
}

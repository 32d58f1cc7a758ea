//! Keyword classifier for lifecycle phase and technical tags.
//!
//! Phase detection walks [`PHASE_KEYWORDS`] in declaration order and returns
//! the first phase whose keyword list has a substring hit in the lower-cased
//! text. The order is the tie-break: "setup" is listed under both
//! `II.Planning` and `VI.Pre-Event`, and `II.Planning` wins.

use crate::models::{Phase, TECHNICAL_TAGS};

/// Priority-ordered phase rules. First match wins.
pub const PHASE_KEYWORDS: [(Phase, &[&str]); 8] = [
    (
        Phase::Inception,
        &["budget", "feasibility", "idea", "concept", "planning"],
    ),
    (
        Phase::Planning,
        &["venue", "logistics", "branding", "design", "setup"],
    ),
    (
        Phase::Sponsorships,
        &["sponsor", "roi", "tier", "package", "partnership"],
    ),
    (
        Phase::Marketing,
        &["marketing", "whatsapp", "social", "promotion", "campaign"],
    ),
    (
        Phase::Ticketing,
        &["ticket", "stripe", "payment", "registration", "checkout"],
    ),
    (
        Phase::PreEvent,
        &["staff", "vendor", "rehearsal", "preparation", "setup"],
    ),
    (
        Phase::LiveEvent,
        &["event", "day", "live", "entry", "safety", "operations"],
    ),
    (
        Phase::PostEvent,
        &["feedback", "report", "analytics", "follow-up", "survey"],
    ),
];

/// Phase returned when no keyword matches.
pub const DEFAULT_PHASE: Phase = Phase::Inception;

/// Classify text into a lifecycle phase. Total: never fails.
pub fn classify_phase(text: &str) -> Phase {
    let lower = text.to_lowercase();
    PHASE_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| lower.contains(kw)))
        .map(|(phase, _)| *phase)
        .unwrap_or(DEFAULT_PHASE)
}

/// Technical tags contained in `text`, in vocabulary order.
pub fn extract_tags(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TECHNICAL_TAGS
        .iter()
        .filter(|tag| lower.contains(*tag))
        .map(|tag| tag.to_string())
        .collect()
}

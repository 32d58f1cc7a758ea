//! Core data models used throughout the knowledge base.
//!
//! The taxonomy (lifecycle phases, audience roles, technical tags) is a set
//! of constant tables. Records flow from drafts (produced by the ingestor or
//! the sample generator) to stored points carrying an id and an embedding.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a phase or role label is not part of the taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LabelError {
    #[error("unknown phase '{0}'; expected one of I.Inception .. VIII.Post-Event")]
    Phase(String),
    #[error("unknown role '{0}'; expected Organizer, Finance, Marketing, Sales, Operations or Attendee")]
    Role(String),
}

/// Event-management lifecycle phase. Declaration order is the lifecycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    #[serde(rename = "I.Inception")]
    Inception,
    #[serde(rename = "II.Planning")]
    Planning,
    #[serde(rename = "III.Sponsorships")]
    Sponsorships,
    #[serde(rename = "IV.Marketing")]
    Marketing,
    #[serde(rename = "V.Ticketing")]
    Ticketing,
    #[serde(rename = "VI.Pre-Event")]
    PreEvent,
    #[serde(rename = "VII.Live-Event")]
    LiveEvent,
    #[serde(rename = "VIII.Post-Event")]
    PostEvent,
}

impl Phase {
    /// All phases in lifecycle order.
    pub const ALL: [Phase; 8] = [
        Phase::Inception,
        Phase::Planning,
        Phase::Sponsorships,
        Phase::Marketing,
        Phase::Ticketing,
        Phase::PreEvent,
        Phase::LiveEvent,
        Phase::PostEvent,
    ];

    /// Stored label, e.g. `"V.Ticketing"`.
    pub fn label(self) -> &'static str {
        match self {
            Phase::Inception => "I.Inception",
            Phase::Planning => "II.Planning",
            Phase::Sponsorships => "III.Sponsorships",
            Phase::Marketing => "IV.Marketing",
            Phase::Ticketing => "V.Ticketing",
            Phase::PreEvent => "VI.Pre-Event",
            Phase::LiveEvent => "VII.Live-Event",
            Phase::PostEvent => "VIII.Post-Event",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Phase::Inception => "Event ideas, feasibility, budgeting",
            Phase::Planning => "Venues, logistics, branding",
            Phase::Sponsorships => "ROI tracking, tiered packages",
            Phase::Marketing => "Social media, WhatsApp automation",
            Phase::Ticketing => "Stripe Connect, refunds, CRM",
            Phase::PreEvent => "Staff, vendors, rehearsals",
            Phase::LiveEvent => "Entry management, safety",
            Phase::PostEvent => "Feedback, reporting, analytics",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Phase {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Phase::ALL
            .iter()
            .copied()
            .find(|p| p.label() == s)
            .ok_or_else(|| LabelError::Phase(s.to_string()))
    }
}

/// Audience role a record is relevant to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Role {
    #[default]
    Organizer,
    Finance,
    Marketing,
    Sales,
    Operations,
    Attendee,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Organizer,
        Role::Finance,
        Role::Marketing,
        Role::Sales,
        Role::Operations,
        Role::Attendee,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Organizer => "Organizer",
            Role::Finance => "Finance",
            Role::Marketing => "Marketing",
            Role::Sales => "Sales",
            Role::Operations => "Operations",
            Role::Attendee => "Attendee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| LabelError::Role(s.to_string()))
    }
}

/// Technical tag vocabulary, in extraction order.
pub const TECHNICAL_TAGS: [&str; 8] = [
    "stripe",
    "whatsapp",
    "supabase",
    "react",
    "api",
    "auth",
    "analytics",
    "automation",
];

fn default_language() -> String {
    "en".to_string()
}

/// A record before upload: no id and no embedding yet.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDraft {
    pub title: String,
    pub content: String,
    pub phase: Phase,
    pub tags: Vec<String>,
    pub roles: Vec<Role>,
    pub source: String,
    pub language: String,
}

impl RecordDraft {
    /// Draft with the default role and language.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        phase: Phase,
        tags: Vec<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            phase,
            tags,
            roles: vec![Role::default()],
            source: source.into(),
            language: default_language(),
        }
    }
}

/// Metadata stored alongside each vector in the store.
///
/// Every non-embedding field of a record, plus the ingestion timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordPayload {
    pub title: String,
    pub content: String,
    pub phase: Phase,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub source: String,
    #[serde(default = "default_language")]
    pub language: String,
    pub created_at: String,
}

/// A stored unit: id, payload and the embedding computed from `content`.
#[derive(Debug, Clone)]
pub struct Record {
    pub id: String,
    pub payload: RecordPayload,
    pub embedding: Vec<f32>,
}

impl Record {
    /// Attach a fresh id, an ingestion timestamp and the embedding to a draft.
    pub fn from_draft(draft: RecordDraft, embedding: Vec<f32>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            payload: RecordPayload {
                title: draft.title,
                content: draft.content,
                phase: draft.phase,
                tags: draft.tags,
                roles: draft.roles,
                source: draft.source,
                language: draft.language,
                created_at: chrono::Utc::now().to_rfc3339(),
            },
            embedding,
        }
    }
}

/// One ranked hit returned by the query service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    pub content: String,
    pub phase: Phase,
    pub tags: Vec<String>,
    pub roles: Vec<Role>,
    pub score: f32,
}

//! # event-kb
//!
//! Populates and queries a Qdrant knowledge base of event-management
//! documentation. Text is chunked on paragraph boundaries, classified into
//! one of eight lifecycle phases, tagged, embedded and stored with its
//! metadata; search is vector similarity filtered by phase and role.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────────┐   ┌──────────┐   ┌──────────┐
//! │  Markdown   │──▶│ Chunk + Classify │──▶│  Embed   │──▶│  Qdrant  │
//! │  docs tree  │   │  (drafts)        │   │ (OpenAI) │   │ upsert   │
//! └─────────────┘   └──────────────────┘   └──────────┘   └────┬─────┘
//!                                                               │
//!        query ──▶ embed ──▶ search(phase, role filter) ◀───────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`models`] | Phases, roles, tags, records |
//! | [`classify`] | Keyword phase classifier and tag extraction |
//! | [`chunk`] | Paragraph-aligned chunker |
//! | [`connector_fs`] | Documentation file discovery |
//! | [`ingest`] | Files → record drafts |
//! | [`samples`] | Built-in sample articles |
//! | [`embedding`] | Embedding providers |
//! | [`store`] | Vector store trait, Qdrant and in-memory backends |
//! | [`upload`] | Embed and upsert drafts |
//! | [`search`] | Query service |
//! | [`client_config`] | MCP client JSON |
//! | [`config`] | TOML configuration |

pub mod chunk;
pub mod classify;
pub mod client_config;
pub mod config;
pub mod connector_fs;
pub mod embedding;
pub mod ingest;
pub mod models;
pub mod samples;
pub mod search;
pub mod store;
pub mod upload;

//! # event-kb CLI
//!
//! Sets up and populates the event-management knowledge base in Qdrant and
//! runs searches against it. Action flags combine freely and run in the
//! order setup → populate → upload-docs → test → query.
//!
//! ```bash
//! export QDRANT_URL=https://cluster.qdrant.tech QDRANT_API_KEY=... OPENAI_API_KEY=...
//! event-kb --setup --populate        # create collection, load sample articles
//! event-kb --upload-docs ./docs      # ingest a markdown tree
//! event-kb --test                    # run the built-in test queries
//! event-kb --query "refund policy" --phase V.Ticketing --role Finance
//! ```

use anyhow::Result;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use event_kb::client_config::render_mcp_config;
use event_kb::config;
use event_kb::embedding::{self, Embedder};
use event_kb::ingest;
use event_kb::models::{Phase, Role};
use event_kb::samples::sample_articles;
use event_kb::search::{print_results, QueryService, DEFAULT_LIMIT};
use event_kb::store::qdrant::QdrantStore;
use event_kb::store::{Distance, KnowledgeStore};
use event_kb::upload::upload_records;

/// Qdrant knowledge base setup for event management documentation.
#[derive(Parser)]
#[command(name = "event-kb", version, about)]
struct Cli {
    /// Create (or recreate) the collection and print the MCP client config.
    #[arg(long)]
    setup: bool,

    /// Upload the built-in sample articles.
    #[arg(long)]
    populate: bool,

    /// Run the built-in battery of test queries.
    #[arg(long)]
    test: bool,

    /// Ingest and upload markdown documentation from this directory.
    #[arg(long, value_name = "PATH")]
    upload_docs: Option<PathBuf>,

    /// Run one search and print the ranked results.
    #[arg(long)]
    query: Option<String>,

    /// Restrict `--query` to a lifecycle phase (e.g. `V.Ticketing`).
    #[arg(long, requires = "query")]
    phase: Option<Phase>,

    /// Restrict `--query` to records tagged for a role (e.g. `Finance`).
    #[arg(long, requires = "query")]
    role: Option<Role>,

    /// Number of results for `--query`.
    #[arg(long, default_value_t = DEFAULT_LIMIT, allow_negative_numbers = true)]
    limit: i64,

    /// Qdrant URL.
    #[arg(long, env = "QDRANT_URL")]
    qdrant_url: Option<String>,

    /// Qdrant API key.
    #[arg(long, env = "QDRANT_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Collection name (defaults to `event-kb`).
    #[arg(long)]
    collection: Option<String>,

    /// Optional TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn has_action(&self) -> bool {
        self.setup
            || self.populate
            || self.test
            || self.upload_docs.is_some()
            || self.query.is_some()
    }

    fn needs_embeddings(&self) -> bool {
        self.populate || self.test || self.upload_docs.is_some() || self.query.is_some()
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    if !cli.has_action() {
        Cli::command().print_help()?;
        return Ok(());
    }

    let cfg = config::load_config(cli.config.as_ref())?.with_overrides(
        cli.qdrant_url.clone(),
        cli.api_key.clone(),
        cli.collection.clone(),
    );
    cfg.validate()?;
    let conn = cfg.connection()?;
    let distance: Distance = cfg.store.distance.parse()?;
    let dims = cfg.vector_size();

    let backend = QdrantStore::new(
        &conn.url,
        &conn.api_key,
        Duration::from_secs(cfg.store.timeout_secs),
    )?;
    let kb = KnowledgeStore::new(backend);

    let embedder: Box<dyn Embedder> = if cli.needs_embeddings() {
        let provider = embedding::create_provider(&cfg.embedding, dims)?;
        info!(
            provider = %cfg.embedding.provider,
            model = provider.model_name(),
            dims = provider.dims(),
            "embedding provider ready"
        );
        provider
    } else {
        Box::new(embedding::DisabledProvider)
    };

    if cli.setup {
        info!("setting up Qdrant knowledge base");
        if kb.create_collection(&conn.collection, dims, distance).await {
            println!("\nMCP client configuration:");
            println!(
                "{}",
                render_mcp_config(&conn.url, &conn.api_key, &conn.collection)?
            );
            println!("\nAdd this configuration to your editor's mcp.json file");
        }
    }

    if cli.populate {
        info!("populating with sample data");
        let report =
            upload_records(&kb, embedder.as_ref(), &conn.collection, sample_articles()).await;
        println!(
            "Uploaded {} sample articles ({} skipped)",
            report.uploaded, report.skipped
        );
    }

    if let Some(docs) = &cli.upload_docs {
        info!(path = %docs.display(), "uploading documentation");
        let drafts = ingest::ingest(docs, &cfg)?;
        let report = upload_records(&kb, embedder.as_ref(), &conn.collection, drafts).await;
        println!(
            "Uploaded {} documentation records ({} skipped)",
            report.uploaded, report.skipped
        );
    }

    let queries = QueryService::new(&kb, embedder.as_ref(), &conn.collection);

    if cli.test {
        queries.run_test_queries().await;
    }

    if let Some(query) = &cli.query {
        let results = queries.search_kb(query, cli.limit, cli.phase, cli.role).await;
        println!("\nQuery: {}", query);
        print_results(&results);
    }

    Ok(())
}

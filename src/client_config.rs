//! MCP client configuration for editors that query the knowledge base
//! through `mcp-server-qdrant`.

use anyhow::Result;
use serde_json::json;

/// Render the `mcpServers` JSON block pointing at the given cluster.
pub fn render_mcp_config(url: &str, api_key: &str, collection: &str) -> Result<String> {
    let config = json!({
        "mcpServers": {
            "qdrant": {
                "command": "uvx",
                "args": ["mcp-server-qdrant"],
                "env": {
                    "QDRANT_URL": url,
                    "QDRANT_API_KEY": api_key,
                    "COLLECTION_NAME": collection,
                }
            }
        }
    });
    Ok(serde_json::to_string_pretty(&config)?)
}

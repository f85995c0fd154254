//! `dbot tools`: prints the durable catalog without touching Telegram, Groq or Zep.

use anyhow::{Context, Result};
use tool_registry::{default_tools, CatalogFile, Tool};

/// Human-readable listing: one block per tool with its secrets and timestamps.
pub fn render_catalog(tools: &[Tool]) -> String {
    if tools.is_empty() {
        return "No tools registered.\n".to_string();
    }
    let mut out = format!("{} tool(s):\n\n", tools.len());
    for tool in tools {
        out.push_str(&format!("{}: {}\n", tool.name(), tool.description()));
        let secrets: Vec<String> = tool.required_secrets().into_iter().collect();
        if !secrets.is_empty() {
            out.push_str(&format!("  secrets: {}\n", secrets.join(", ")));
        }
        out.push_str(&format!("  created: {}\n", tool.created_at().to_rfc3339()));
        out.push_str(&format!(
            "  last modified: {}\n\n",
            tool.last_modified().to_rfc3339()
        ));
    }
    out
}

/// Reads `path` and renders it. A missing file shows the defaults seeded on first run.
pub fn describe_catalog(path: &str) -> Result<String> {
    let catalog = CatalogFile::new(path);
    let loaded = catalog
        .load()
        .with_context(|| format!("Failed to read tool catalog {}", path))?;
    Ok(match loaded {
        Some(tools) => render_catalog(&tools),
        None => format!(
            "{} does not exist yet; these defaults are seeded on first run.\n\n{}",
            path,
            render_catalog(&default_tools())
        ),
    })
}

//! CLI binary for sift.
//!
//! Output is pretty JSON on stdout. Logs go to stderr so stdout stays
//! machine-readable.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::json;
use sift::{SiftConfig, Toolkit, ToolResult};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Sift: trust-ranked web search, page fetching and verbatim quotes.
#[derive(Parser)]
#[command(name = "sift", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Search the web and print ranked results.
    Search {
        /// The search query.
        query: String,
        /// Only return results from the last N days.
        #[arg(long)]
        recency_days: Option<u32>,
        /// Comma-separated domains to search within.
        #[arg(long)]
        sites: Option<String>,
        /// Comma-separated domains to exclude.
        #[arg(long)]
        blocked_sites: Option<String>,
        /// Maximum number of results (1-10).
        #[arg(long)]
        max_results: Option<usize>,
    },

    /// Fetch a page and print its text and quotes.
    Fetch {
        /// The http(s) URL to fetch.
        url: String,
        /// Rank quotes by relevance to this query.
        #[arg(long)]
        query: Option<String>,
    },

    /// Extract quotes from a local text file.
    Quotes {
        /// Text file to quote from.
        file: PathBuf,
        /// Rank quotes by relevance to this query.
        #[arg(long)]
        query: Option<String>,
    },

    /// Print the JSON schemas of the available tools.
    Tools,

    /// Write a default configuration file.
    InitConfig {
        /// Destination (defaults to ~/.config/sift/config.toml).
        path: Option<PathBuf>,
    },
}

fn init_tracing(json_logs: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sift=info,sift_search=info"));
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter);
    if json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let config = SiftConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    let toolkit = Toolkit::from_config(config)?;
    let registry = toolkit.registry();

    let outcome = match cli.command {
        Command::Search {
            query,
            recency_days,
            sites,
            blocked_sites,
            max_results,
        } => {
            let args = json!({
                "query": query,
                "recency_days": recency_days,
                "sites": sites,
                "blocked_sites": blocked_sites,
                "max_results": max_results,
            });
            registry.execute("web_search", args).await?
        }
        Command::Fetch { url, query } => {
            registry
                .execute("fetch_url", json!({ "url": url, "query": query }))
                .await?
        }
        Command::Quotes { file, query } => {
            let text = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            let args = json!({
                "text": text,
                "query": query,
                "source_title": file.file_name().map(|n| n.to_string_lossy().into_owned()),
            });
            registry.execute("extract_quotes", args).await?
        }
        Command::Tools => {
            let schemas = serde_json::to_string_pretty(&registry.schemas_for_api())?;
            ToolResult::success(schemas)
        }
        Command::InitConfig { path } => {
            let path = path.unwrap_or_else(SiftConfig::default_config_path);
            SiftConfig::default()
                .save_to_file(&path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            ToolResult::success(serde_json::to_string_pretty(&json!({ "written": path }))?)
        }
    };

    toolkit.shutdown();
    report(outcome)
}

fn report(outcome: ToolResult) -> anyhow::Result<()> {
    if !outcome.content.is_empty() {
        println!("{}", outcome.content);
    }
    match outcome.error {
        Some(error) => anyhow::bail!(error),
        None => Ok(()),
    }
}

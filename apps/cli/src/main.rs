//! Content search command line front-end
//!
//! Usage:
//!   content-search [--config FILE] find --criterion FILE [--offset N] [--limit N] [--sort target:asc|desc]...
//!   content-search [--config FILE] find-single --criterion FILE
//!   content-search [--config FILE] analyze PHRASE

mod logging;

use anyhow::Context;
use clap::{Parser, Subcommand};
use ferrum_search::fulltext::PhraseAnalysis;
use ferrum_search::{Criterion, FullTextAnalyzer, SearchConfig, SearchHandler, SortClause};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[clap(name = "content-search")]
#[clap(about = "Run criterion searches against a content store")]
struct Args {
    /// Configuration file (TOML, YAML or JSON). Defaults to ./content-search.* if present.
    #[clap(short, long, global = true)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the matching page and total count as JSON
    Find {
        /// JSON file holding the criterion tree
        #[clap(long)]
        criterion: PathBuf,

        #[clap(long, default_value_t = 0)]
        offset: u64,

        /// Page size; defaults to `search.default_limit`
        #[clap(long)]
        limit: Option<u64>,

        /// Sort clause, e.g. `date_modified:desc` or `field/product/price:asc`
        #[clap(long = "sort")]
        sort: Vec<SortClause>,
    },

    /// Print the single matching content item, failing unless exactly one matches
    FindSingle {
        #[clap(long)]
        criterion: PathBuf,
    },

    /// Print the normalized full-text tokens of a phrase
    Analyze { phrase: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config =
        SearchConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    logging::init_logging(&config.logging).context("Failed to initialize logging")?;

    match args.command {
        Command::Find {
            criterion,
            offset,
            limit,
            sort,
        } => {
            let criterion = read_criterion(&criterion)?;
            let handler = connect(&config).await?;
            let limit = limit.unwrap_or(config.search.default_limit);
            let result = handler
                .find(&criterion, offset, Some(limit), &sort)
                .await
                .context("Search failed")?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::FindSingle { criterion } => {
            let criterion = read_criterion(&criterion)?;
            let handler = connect(&config).await?;
            let content = handler
                .find_single(&criterion)
                .await
                .context("Search failed")?;
            println!("{}", serde_json::to_string_pretty(&content)?);
        }
        Command::Analyze { phrase } => {
            let analyzer = FullTextAnalyzer::from_config(config.full_text.clone())
                .context("Failed to load transformation rules")?;
            let output = analysis_json(&analyzer.analyze(&phrase));
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn read_criterion(path: &Path) -> anyhow::Result<Criterion> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read criterion file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Invalid criterion in {}", path.display()))
}

fn analysis_json(analysis: &PhraseAnalysis) -> serde_json::Value {
    match analysis {
        PhraseAnalysis::MatchAll => serde_json::json!({ "match_all": true }),
        PhraseAnalysis::Tokens(tokens) => serde_json::json!({
            "match_all": false,
            "tokens": tokens
        }),
    }
}

async fn connect(config: &SearchConfig) -> anyhow::Result<SearchHandler> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Connecting content store");
    SearchHandler::connect(config)
        .await
        .context("Failed to initialize search handler")
}

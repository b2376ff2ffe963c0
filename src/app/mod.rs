use anyhow::{Context, Result, anyhow};
use clap::{ArgGroup, Parser, ValueEnum};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sift::Card;
use sift::query::{SearchError, SearchResult};
use std::path::{Path, PathBuf};

use crate::config::SiftConfig;
use crate::sinks::{DataSink, JsonSink, JsonlSink, TextSink, open_writer};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("source").required(true).args(["query", "saved"])))]
pub struct Cli {
    /// Card file (JSON array or JSON lines of Scryfall card objects)
    #[arg(short, long)]
    pub cards: Option<PathBuf>,

    /// Search query
    #[arg(short, long)]
    pub query: Option<String>,

    /// Name of a saved query from the config file
    #[arg(short, long)]
    pub saved: Option<String>,

    /// Configuration file (YAML)
    #[arg(long, env = "SIFT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the query in plain English and exit
    #[arg(long)]
    pub explain: bool,

    /// Output format (config default, else text)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Output file, or - for stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Add a category from the named mapping to each result
    #[arg(long)]
    pub classify: Option<String>,

    /// Number of threads (default: all cores)
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Jsonl,
    Json,
}

/// The query text from `--query`, or the saved query `--saved` names.
pub fn resolve_query(cli: &Cli, config: &SiftConfig) -> Result<String> {
    match (&cli.query, &cli.saved) {
        (Some(query), _) => Ok(query.clone()),
        (None, Some(name)) => Ok(config.saved_query(name)?.to_string()),
        (None, None) => Err(anyhow!("CLI: Either --query or --saved is required")),
    }
}

/// Render a query failure with the offending span underlined.
pub fn query_error(err: &SearchError) -> anyhow::Error {
    match err.underline() {
        Some(underline) => anyhow!("Query: {}\n{}", err.message(), underline),
        None => anyhow!("Query: {}", err.message()),
    }
}

pub fn init_sink(format: OutputFormat, output: Option<&Path>) -> Result<Box<dyn DataSink>> {
    let writer = open_writer(output)?;
    let sink: Box<dyn DataSink> = match format {
        OutputFormat::Text => Box::new(TextSink::new(writer)),
        OutputFormat::Jsonl => Box::new(JsonlSink::new(writer)),
        OutputFormat::Json => Box::new(JsonSink::new(writer).context("Output: Failed to start JSON array")?),
    };
    Ok(sink)
}

/// Evaluate the compiled query over every card in parallel, keeping input order.
pub fn filter_cards<'a>(cards: &'a [Card], search: &SearchResult) -> Vec<&'a Card> {
    cards.par_iter().filter(|card| search.matches(card)).collect()
}

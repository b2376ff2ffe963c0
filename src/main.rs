mod app;
mod config;
mod mapping;
mod sinks;

use anyhow::{Context, Result};
use clap::Parser;
use sift::query::{SearchError, describe_query};

use app::{Cli, OutputFormat, filter_cards, init_sink, query_error, resolve_query};
use config::SiftConfig;
use mapping::evaluate_mapping;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("CLI: Failed to initialize thread pool")?;
    }

    let config = match &cli.config {
        Some(path) => SiftConfig::load(path)?,
        None => SiftConfig::default(),
    };

    let query = resolve_query(&cli, &config)?;

    if cli.explain {
        let ast = sift::parse(&query).map_err(|e| query_error(&SearchError::from(e)))?;
        println!("{}", describe_query(&ast));
        return Ok(());
    }

    let search = sift::search(&query).map_err(|e| query_error(&e))?;
    tracing::info!("Query: {}", describe_query(&search.ast));

    let mapping = cli
        .classify
        .as_deref()
        .map(|name| config.mapping(name))
        .transpose()?;

    let cards_path = cli
        .cards
        .as_deref()
        .context("CLI: --cards is required unless --explain is given")?;

    let start = std::time::Instant::now();
    let cards = sift::load_cards(cards_path)?;
    tracing::info!("Loaded {} cards from {}", cards.len(), cards_path.display());

    let matched = filter_cards(&cards, &search);

    let format = cli
        .format
        .or(config.defaults.format)
        .unwrap_or(OutputFormat::Text);
    let mut sink = init_sink(format, cli.output.as_deref())?;
    for card in &matched {
        let category = mapping.as_ref().and_then(|m| evaluate_mapping(m, card));
        sink.add_card(card, category)
            .context("Output: Failed to write card")?;
    }
    sink.finish().context("Output: Failed to finalize sink")?;

    let elapsed = start.elapsed();
    tracing::info!(
        "Done! {} of {} cards matched in {:.2}s",
        matched.len(),
        cards.len(),
        elapsed.as_secs_f64()
    );

    Ok(())
}

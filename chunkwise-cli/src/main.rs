use anyhow::{Context, Result};
use chunkwise_core::Source;
use colored::Colorize;
use ingestion::{LoaderRegistry, SourceRouter};
use splitter::{CharacterSplitter, TextSplitter};
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

mod config;
mod pretty;
mod repl;

use config::{Config, PreviewConfig};
use pretty::{print_chunks, print_docs_pretty};
use repl::run_repl;

fn main() -> Result<()> {
    // Load .env file if it exists (searches current dir and parent dirs)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();

    let config = Config::load()?;
    let router = SourceRouter::new(LoaderRegistry::with_defaults(&config.loaders));
    tracing::debug!("Available loaders: {:?}", router.registry().available());

    println!("{}", "CLI started. Type 'exit' to quit.".cyan());

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(preview) = &config.preview {
        show_preview(&router, preview, &config, &mut out)?;
    }

    run_repl(io::stdin().lock(), &mut out).context("failed to run the prompt loop")?;
    Ok(())
}

/// Load the configured source, print it and its character-split chunks.
fn show_preview<W: Write>(router: &SourceRouter, preview: &PreviewConfig, config: &Config, out: &mut W) -> Result<()> {
    let docs = router
        .load_documents(&Source::from(preview.source.as_str()), preview.source_type)
        .with_context(|| format!("failed to load preview source {}", preview.source))?;
    print_docs_pretty(&docs, true, out)?;

    let split = preview.split.unwrap_or(config.split);
    let chunks = CharacterSplitter::new(split).split_documents(&docs)?;
    print_chunks(&chunks, out)?;
    Ok(())
}

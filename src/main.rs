//! # Tri-Source News
//!
//! Aggregates headlines from three public APIs into one page:
//!
//! - Hacker News top stories
//! - Hot link posts from a handful of subreddits
//! - Recently created GitHub repositories ranked by stars
//!
//! ## Usage
//!
//! ```sh
//! tri_source_news --category science --format markdown
//! ```
//!
//! ## Architecture
//!
//! One run is one aggregation cycle:
//! 1. **Validate**: reject a search query shorter than 2 characters
//! 2. **Fetch**: all sources run concurrently; a failing source contributes nothing
//! 3. **Merge**: filter by category and text, sort newest first, keep 20
//! 4. **Render**: map the load state to a view and print it

use clap::Parser;
use std::error::Error;
use std::process::ExitCode;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod aggregator;
mod cli;
mod config;
mod error;
mod feed;
mod models;
mod outputs;
mod sources;
mod utils;

use aggregator::Aggregator;
use cli::{Cli, OutputFormat};
use config::Config;
use error::RequestError;
use feed::{LoadState, NewsFeed};
use outputs::{json, markdown, view};

#[tokio::main]
async fn main() -> ExitCode {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "Aggregation aborted");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[instrument(level = "info", skip_all)]
async fn run(args: Cli) -> Result<ExitCode, Box<dyn Error>> {
    let start_time = std::time::Instant::now();

    let request = match args.request() {
        Ok(request) => request,
        Err(e @ RequestError::QueryTooShort { .. }) => {
            eprintln!("{e}");
            return Ok(ExitCode::from(2));
        }
        Err(e) => return Err(e.into()),
    };
    let category = request.category();

    let config = Config::load(args.config.as_deref())
        .await?
        .with_max_articles(args.max_articles)?;

    let client = sources::build_client(&config)?;
    let sources = sources::from_config(&config, &client);
    info!(
        sources = sources.len(),
        max_articles = config.max_articles,
        "Sources configured"
    );
    let feed = NewsFeed::new(Aggregator::new(sources, config.max_articles));
    let state = feed.load(&request).await;

    let output = match args.format {
        OutputFormat::Text => view::render(&state, category).to_string(),
        OutputFormat::Markdown => markdown::view_to_markdown(&view::render(&state, category)),
        OutputFormat::Json => json::state_to_json(&request, &state)?,
    };
    println!("{output}");

    let elapsed = start_time.elapsed();
    info!(?elapsed, "Execution complete");

    Ok(match state {
        LoadState::Failed { .. } => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}

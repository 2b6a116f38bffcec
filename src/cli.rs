//! Command-line interface definitions.
//!
//! Every option can also be set through an environment variable.

use clap::{Parser, ValueEnum};

use crate::error::RequestError;
use crate::models::{Category, NewsRequest};

/// How the aggregated page is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Markdown,
    Json,
}

/// Fetch headlines from Hacker News, Reddit and GitHub trending, then
/// filter, sort and print them.
///
/// # Examples
///
/// ```sh
/// # Everything, newest first
/// tri_source_news
///
/// # Science only, as Markdown
/// tri_source_news --category science --format markdown
///
/// # Text search with a custom config
/// tri_source_news --query rust --config ./news.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Only show articles in this category (technology, business, science,
    /// sports, health, entertainment, politics, general)
    #[arg(short, long, env = "NEWS_CATEGORY")]
    pub category: Option<String>,

    /// Only show articles whose title or description contains this text
    /// (at least 2 characters, case-insensitive)
    #[arg(short, long, env = "NEWS_QUERY")]
    pub query: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text, env = "NEWS_FORMAT")]
    pub format: OutputFormat,

    /// Optional path to a YAML config file
    #[arg(long, env = "NEWS_CONFIG")]
    pub config: Option<String>,

    /// Override the number of articles kept after sorting
    #[arg(long, env = "NEWS_MAX_ARTICLES")]
    pub max_articles: Option<usize>,
}

impl Cli {
    /// The category flag, with `""` and `all` meaning no filter.
    pub fn category_filter(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"))
    }

    /// Validate the category and query flags into the request that drives
    /// the whole run.
    pub fn request(&self) -> Result<NewsRequest, RequestError> {
        let category = self
            .category_filter()
            .map(str::parse::<Category>)
            .transpose()?;
        NewsRequest::new(category, self.query.as_deref())
    }
}

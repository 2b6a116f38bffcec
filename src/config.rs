//! YAML configuration.
//!
//! Every field has a default, so the file is optional and may be partial:
//!
//! ```yaml
//! max_articles: 20
//! reddit:
//!   subreddits: [worldnews, technology, science, business]
//! github:
//!   created_after: "2024-01-01"
//! ```

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{info, instrument};

use crate::error::NewsError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sent on every request. Reddit and GitHub refuse anonymous clients.
    pub user_agent: String,
    /// Per-request timeout. Unset means wait as long as the server does.
    pub request_timeout_secs: Option<u64>,
    /// Articles kept after sorting.
    pub max_articles: usize,
    pub hacker_news: HackerNewsConfig,
    pub reddit: RedditConfig,
    pub github: GitHubConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: concat!("tri_source_news/", env!("CARGO_PKG_VERSION")).to_string(),
            request_timeout_secs: None,
            max_articles: 20,
            hacker_news: HackerNewsConfig::default(),
            reddit: RedditConfig::default(),
            github: GitHubConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HackerNewsConfig {
    pub enabled: bool,
    pub base_url: String,
    /// How many of the top story ids get their details fetched.
    pub story_limit: usize,
}

impl Default for HackerNewsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://hacker-news.firebaseio.com/v0".to_string(),
            story_limit: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedditConfig {
    pub enabled: bool,
    pub base_url: String,
    pub subreddits: Vec<String>,
    pub posts_per_subreddit: usize,
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://www.reddit.com".to_string(),
            subreddits: ["worldnews", "technology", "science", "business"]
                .into_iter()
                .map(String::from)
                .collect(),
            posts_per_subreddit: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    pub enabled: bool,
    pub api_url: String,
    /// Only repositories created after this date (`YYYY-MM-DD`) are searched.
    pub created_after: String,
    pub per_page: usize,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_url: "https://api.github.com".to_string(),
            created_after: "2024-01-01".to_string(),
            per_page: 5,
        }
    }
}

impl Config {
    /// Parse a YAML document. Missing keys take their defaults.
    pub fn from_yaml(text: &str) -> Result<Self, NewsError> {
        let config: Config =
            serde_yaml::from_str(text).map_err(|e| NewsError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or fall back to defaults when no path is given.
    #[instrument(level = "info")]
    pub async fn load(path: Option<&str>) -> Result<Self, NewsError> {
        let Some(path) = path else {
            info!("No config file given; using defaults");
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .await
            .map_err(|e| NewsError::Config(format!("cannot read {path}: {e}")))?;
        let config = Self::from_yaml(&text)?;
        info!(path, "Loaded configuration");
        Ok(config)
    }

    /// Apply a command-line override of `max_articles`, re-running the same
    /// checks a config file goes through.
    pub fn with_max_articles(mut self, max_articles: Option<usize>) -> Result<Self, NewsError> {
        if let Some(max) = max_articles {
            self.max_articles = max;
            self.validate()?;
        }
        Ok(self)
    }

    fn validate(&self) -> Result<(), NewsError> {
        if self.max_articles == 0 {
            return Err(NewsError::Config("max_articles must be at least 1".into()));
        }
        if chrono::NaiveDate::parse_from_str(&self.github.created_after, "%Y-%m-%d").is_err() {
            return Err(NewsError::Config(format!(
                "github.created_after `{}` is not a YYYY-MM-DD date",
                self.github.created_after
            )));
        }
        Ok(())
    }
}

//! Content sources that feed the aggregator.
//!
//! Each source talks to one public, unauthenticated JSON API and maps its
//! payload into [`Article`]s.
//!
//! # Supported Sources
//!
//! | Source | Module | Endpoint | Category |
//! |--------|--------|----------|----------|
//! | Hacker News | [`hacker_news`] | `topstories` + `item/{id}` | always technology |
//! | Reddit | [`reddit`] | `r/{sub}/hot.json` | from the subreddit table |
//! | GitHub Trending | [`github`] | `search/repositories` | always technology |
//!
//! # Failure Handling
//!
//! Item-level problems (a story without a link, a subreddit that fails to
//! load) are logged and skipped inside the source. Anything that stops the
//! source as a whole is returned as an `Err`, which the aggregator logs and
//! treats as an empty contribution.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::config::Config;
use crate::error::NewsError;
use crate::models::Article;
use crate::utils::truncate_for_log;

pub mod github;
pub mod hacker_news;
pub mod reddit;

/// One external content provider.
#[async_trait]
pub trait Source: Send + Sync {
    /// Human-readable name used in logs.
    fn name(&self) -> &str;

    /// Fetch and normalize this source's current articles.
    async fn fetch_articles(&self) -> Result<Vec<Article>, NewsError>;
}

/// Build the HTTP client shared by every source.
pub fn build_client(config: &Config) -> Result<Client, NewsError> {
    let mut builder = Client::builder().user_agent(config.user_agent.clone());
    if let Some(secs) = config.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder
        .build()
        .map_err(|e| NewsError::Config(format!("cannot build HTTP client: {e}")))
}

/// GET `url` and decode the body as JSON.
#[instrument(level = "debug", skip(client))]
pub(crate) async fn get_json<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T, NewsError> {
    let response = client.get(url).send().await.map_err(|source| NewsError::Http {
        url: url.to_string(),
        source,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(NewsError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await.map_err(|source| NewsError::Http {
        url: url.to_string(),
        source,
    })?;
    debug!(bytes = body.len(), "Received response body");

    serde_json::from_str(&body).map_err(|source| {
        warn!(
            error = %source,
            body_preview = %truncate_for_log(&body, 200),
            "Response did not match expected shape"
        );
        NewsError::Decode {
            url: url.to_string(),
            source,
        }
    })
}

/// The sources enabled in `config`, in a fixed order.
pub fn from_config(config: &Config, client: &Client) -> Vec<Arc<dyn Source>> {
    let mut sources: Vec<Arc<dyn Source>> = Vec::new();
    if config.hacker_news.enabled {
        sources.push(Arc::new(hacker_news::HackerNews::new(
            client.clone(),
            &config.hacker_news,
        )));
    }
    if config.reddit.enabled {
        sources.push(Arc::new(reddit::Reddit::new(client.clone(), &config.reddit)));
    }
    if config.github.enabled {
        sources.push(Arc::new(github::GitHubTrending::new(
            client.clone(),
            &config.github,
        )));
    }
    sources
}

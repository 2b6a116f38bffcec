//! Hacker News top stories.
//!
//! Uses the public Firebase API: one call for the ranked id list, then one
//! call per story for the details. Story details are fetched concurrently.
//! Stories without an external link (Ask HN, polls, jobs without a url) are
//! dropped.

use async_trait::async_trait;
use chrono::DateTime;
use futures::future::join_all;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use super::{Source, get_json};
use crate::config::HackerNewsConfig;
use crate::error::NewsError;
use crate::models::{Article, Category};

const SOURCE_NAME: &str = "Hacker News";
const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/400x200/FF6600/ffffff?text=Hacker+News";

/// Story detail as returned by `item/{id}.json`.
///
/// Deleted or dead items come back as `null`, and non-story items may lack
/// most fields, so everything is optional.
#[derive(Debug, Deserialize)]
struct Story {
    title: Option<String>,
    url: Option<String>,
    /// Unix seconds.
    time: Option<i64>,
    score: Option<u64>,
}

impl Story {
    fn into_article(self) -> Option<Article> {
        let title = self.title.filter(|t| !t.trim().is_empty())?;
        let url = self.url.filter(|u| !u.trim().is_empty())?;
        Some(Article {
            description: title.clone(),
            title,
            url,
            image_url: PLACEHOLDER_IMAGE.to_string(),
            published_at: self.time.and_then(|t| DateTime::from_timestamp(t, 0)),
            source_name: SOURCE_NAME.to_string(),
            category: Category::Technology,
            score: self.score.unwrap_or(0),
        })
    }
}

#[derive(Debug)]
pub struct HackerNews {
    client: Client,
    base_url: String,
    story_limit: usize,
}

impl HackerNews {
    pub fn new(client: Client, config: &HackerNewsConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            story_limit: config.story_limit,
        }
    }

    /// Fetch one story; any failure is logged and turned into `None`.
    #[instrument(level = "debug", skip(self))]
    async fn fetch_story(&self, id: u64) -> Option<Article> {
        let url = format!("{}/item/{}.json", self.base_url, id);
        match get_json::<Option<Story>>(&self.client, &url).await {
            Ok(Some(story)) => {
                let article = story.into_article();
                if article.is_none() {
                    debug!(id, "Story has no title or link; skipping");
                }
                article
            }
            Ok(None) => {
                debug!(id, "Story no longer exists");
                None
            }
            Err(e) => {
                warn!(id, error = %e, "Story fetch failed");
                None
            }
        }
    }
}

#[async_trait]
impl Source for HackerNews {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    #[instrument(level = "info", skip_all)]
    async fn fetch_articles(&self) -> Result<Vec<Article>, NewsError> {
        let list_url = format!("{}/topstories.json", self.base_url);
        let ids: Vec<u64> = get_json(&self.client, &list_url).await?;
        debug!(available = ids.len(), "Fetched top story ids");

        let stories = join_all(
            ids.into_iter()
                .take(self.story_limit)
                .map(|id| self.fetch_story(id)),
        )
        .await;

        let articles: Vec<Article> = stories.into_iter().flatten().collect();
        info!(count = articles.len(), "Fetched Hacker News stories");
        Ok(articles)
    }
}

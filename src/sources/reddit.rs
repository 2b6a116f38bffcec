//! Reddit hot posts from a fixed set of subreddits.
//!
//! Only link posts pointing outside Reddit are kept; self posts and links
//! back into Reddit are discussion threads, not news. Subreddits are
//! fetched one after another and a failing subreddit is logged and skipped.

use async_trait::async_trait;
use chrono::DateTime;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde::Deserialize;
use tracing::{error, info, instrument};
use url::Url;

use super::{Source, get_json};
use crate::config::RedditConfig;
use crate::error::NewsError;
use crate::models::{Article, Category};

const SOURCE_NAME: &str = "Reddit";
const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/400x200/FF4500/ffffff?text=Reddit";

/// Map a subreddit to the category its posts are filed under.
pub fn category_for_subreddit(subreddit: &str) -> Category {
    match subreddit {
        "worldnews" => Category::Politics,
        "technology" => Category::Technology,
        "science" => Category::Science,
        "business" => Category::Business,
        "sports" => Category::Sports,
        "entertainment" => Category::Entertainment,
        _ => Category::General,
    }
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: Option<ListingData>,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: Post,
}

#[derive(Debug, Deserialize)]
struct Post {
    title: Option<String>,
    #[serde(default)]
    is_self: bool,
    url: Option<String>,
    selftext: Option<String>,
    created_utc: Option<f64>,
    score: Option<i64>,
    preview: Option<Preview>,
}

#[derive(Debug, Deserialize)]
struct Preview {
    #[serde(default)]
    images: Vec<PreviewImage>,
}

#[derive(Debug, Deserialize)]
struct PreviewImage {
    source: Option<ImageSource>,
}

#[derive(Debug, Deserialize)]
struct ImageSource {
    url: Option<String>,
}

/// True when `link` points at reddit.com or one of its subdomains.
fn is_reddit_link(link: &Url) -> bool {
    link.host_str()
        .map(|h| h == "reddit.com" || h.ends_with(".reddit.com"))
        .unwrap_or(false)
}

impl Post {
    fn into_article(self, subreddit: &str) -> Option<Article> {
        if self.is_self {
            return None;
        }
        let title = self.title.filter(|t| !t.trim().is_empty())?;
        let url = self.url?;
        let link = Url::parse(&url).ok()?;
        if is_reddit_link(&link) {
            return None;
        }

        let image_url = self
            .preview
            .and_then(|p| p.images.into_iter().next())
            .and_then(|i| i.source)
            .and_then(|s| s.url)
            .map(|u| u.replace("&amp;", "&"))
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string());

        Some(Article {
            description: self
                .selftext
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| title.clone()),
            title,
            url,
            image_url,
            published_at: self
                .created_utc
                .and_then(|t| DateTime::from_timestamp(t as i64, 0)),
            source_name: format!("r/{}", subreddit),
            category: category_for_subreddit(subreddit),
            score: self.score.map(|s| s.max(0) as u64).unwrap_or(0),
        })
    }
}

fn listing_to_articles(listing: Listing, subreddit: &str) -> Vec<Article> {
    listing
        .data
        .map(|d| d.children)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|c| c.data.into_article(subreddit))
        .collect()
}

#[derive(Debug)]
pub struct Reddit {
    client: Client,
    base_url: String,
    subreddits: Vec<String>,
    posts_per_subreddit: usize,
}

impl Reddit {
    pub fn new(client: Client, config: &RedditConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            subreddits: config.subreddits.clone(),
            posts_per_subreddit: config.posts_per_subreddit,
        }
    }

    #[instrument(level = "debug", skip(self))]
    async fn fetch_subreddit(&self, subreddit: &str) -> Result<Vec<Article>, NewsError> {
        let url = format!(
            "{}/r/{}/hot.json?limit={}",
            self.base_url, subreddit, self.posts_per_subreddit
        );
        let listing: Listing = get_json(&self.client, &url).await?;
        Ok(listing_to_articles(listing, subreddit))
    }
}

#[async_trait]
impl Source for Reddit {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    #[instrument(level = "info", skip_all)]
    async fn fetch_articles(&self) -> Result<Vec<Article>, NewsError> {
        let per_subreddit: Vec<Vec<Article>> = stream::iter(self.subreddits.iter())
            .then(|subreddit| async move {
                match self.fetch_subreddit(subreddit).await {
                    Ok(articles) => {
                        info!(subreddit = %subreddit, count = articles.len(), "Fetched subreddit");
                        articles
                    }
                    Err(e) => {
                        error!(subreddit = %subreddit, error = %e, "Subreddit fetch failed");
                        Vec::new()
                    }
                }
            })
            .collect()
            .await;

        Ok(per_subreddit.into_iter().flatten().collect())
    }
}

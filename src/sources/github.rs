//! Recently created GitHub repositories ranked by stars.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, instrument};

use super::{Source, get_json};
use crate::config::GitHubConfig;
use crate::error::NewsError;
use crate::models::{Article, Category};

const SOURCE_NAME: &str = "GitHub Trending";
const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/400x200/333333/ffffff?text=GitHub";
const FALLBACK_DESCRIPTION: &str = "Popular GitHub repository gaining attention";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    items: Option<Vec<Repository>>,
}

#[derive(Debug, Deserialize)]
struct Repository {
    name: String,
    description: Option<String>,
    html_url: String,
    updated_at: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
}

impl Repository {
    fn into_article(self) -> Option<Article> {
        if self.name.trim().is_empty() || self.html_url.trim().is_empty() {
            return None;
        }
        Some(Article {
            title: format!("🔥 Trending: {}", self.name),
            description: self
                .description
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| FALLBACK_DESCRIPTION.to_string()),
            url: self.html_url,
            image_url: PLACEHOLDER_IMAGE.to_string(),
            published_at: self
                .updated_at
                .and_then(|t| DateTime::parse_from_rfc3339(&t).ok())
                .map(|t| t.with_timezone(&Utc)),
            source_name: SOURCE_NAME.to_string(),
            category: Category::Technology,
            score: self.stargazers_count,
        })
    }
}

fn response_to_articles(response: SearchResponse) -> Vec<Article> {
    response
        .items
        .unwrap_or_default()
        .into_iter()
        .filter_map(Repository::into_article)
        .collect()
}

#[derive(Debug)]
pub struct GitHubTrending {
    client: Client,
    search_url: String,
}

impl GitHubTrending {
    pub fn new(client: Client, config: &GitHubConfig) -> Self {
        let query = format!("created:>{}", config.created_after);
        let search_url = format!(
            "{}/search/repositories?q={}&sort=stars&order=desc&per_page={}",
            config.api_url.trim_end_matches('/'),
            urlencoding::encode(&query),
            config.per_page
        );
        Self { client, search_url }
    }
}

#[async_trait]
impl Source for GitHubTrending {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    #[instrument(level = "info", skip_all)]
    async fn fetch_articles(&self) -> Result<Vec<Article>, NewsError> {
        let response: SearchResponse = get_json(&self.client, &self.search_url).await?;
        let articles = response_to_articles(response);
        info!(count = articles.len(), "Fetched GitHub trending repositories");
        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::test_server::serve;

    #[test]
    fn test_search_url_is_encoded() {
        let gh = GitHubTrending::new(Client::new(), &GitHubConfig::default());
        assert_eq!(
            gh.search_url,
            "https://api.github.com/search/repositories?q=created%3A%3E2024-01-01&sort=stars&order=desc&per_page=5"
        );
    }

    #[test]
    fn test_repositories_map_to_articles() {
        let response: SearchResponse = serde_json::from_str(
            r#"{"total_count": 2, "items": [
                {"name": "fastcache", "description": "A very fast cache",
                 "html_url": "https://github.com/acme/fastcache",
                 "updated_at": "2025-05-06T10:00:00Z", "stargazers_count": 4200},
                {"name": "nodesc", "description": null,
                 "html_url": "https://github.com/acme/nodesc",
                 "updated_at": "not a date", "stargazers_count": 17}
            ]}"#,
        )
        .unwrap();

        let articles = response_to_articles(response);
        assert_eq!(articles.len(), 2);

        let a = &articles[0];
        assert_eq!(a.title, "🔥 Trending: fastcache");
        assert_eq!(a.description, "A very fast cache");
        assert_eq!(a.url, "https://github.com/acme/fastcache");
        assert_eq!(a.category, Category::Technology);
        assert_eq!(a.score, 4200);
        assert_eq!(a.published_at.unwrap().to_rfc3339(), "2025-05-06T10:00:00+00:00");

        let b = &articles[1];
        assert_eq!(b.description, FALLBACK_DESCRIPTION);
        assert!(b.published_at.is_none());
    }

    #[test]
    fn test_missing_items_yields_nothing() {
        let response: SearchResponse =
            serde_json::from_str(r#"{"message": "API rate limit exceeded"}"#).unwrap();
        assert!(response_to_articles(response).is_empty());
    }

    #[tokio::test]
    async fn test_fetch_sends_search_query() {
        let base = serve(|path| {
            if path == "/search/repositories?q=created%3A%3E2025-01-01&sort=stars&order=desc&per_page=2" {
                (
                    200,
                    r#"{"items": [{"name": "fastcache", "description": "A very fast cache",
                        "html_url": "https://github.com/acme/fastcache",
                        "updated_at": "2025-05-06T10:00:00Z", "stargazers_count": 4200}]}"#
                        .to_string(),
                )
            } else {
                (404, String::new())
            }
        })
        .await;
        let config = GitHubConfig {
            api_url: base,
            created_after: "2025-01-01".into(),
            per_page: 2,
            ..GitHubConfig::default()
        };

        let articles = GitHubTrending::new(Client::new(), &config)
            .fetch_articles()
            .await
            .unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].url, "https://github.com/acme/fastcache");
    }

    #[tokio::test]
    async fn test_rate_limited_search_is_an_error() {
        let base = serve(|_| (403, r#"{"message":"API rate limit exceeded"}"#.to_string())).await;
        let config = GitHubConfig {
            api_url: base,
            ..GitHubConfig::default()
        };
        let err = GitHubTrending::new(Client::new(), &config)
            .fetch_articles()
            .await
            .unwrap_err();
        assert!(matches!(err, NewsError::Status { status: 403, .. }));
    }
}

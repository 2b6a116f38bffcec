//! Multi-source aggregation.
//!
//! One aggregation cycle:
//! 1. **Fan-out**: every source runs in its own task
//! 2. **Join**: wait for all of them to settle, failed ones contribute nothing
//! 3. **Filter**: by category, then by case-insensitive text match
//! 4. **Sort**: newest first, undated last, stable
//! 5. **Truncate**: keep the first `max_articles`

use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

use crate::error::NewsError;
use crate::models::{Article, NewsRequest};
use crate::sources::Source;

pub struct Aggregator {
    sources: Vec<Arc<dyn Source>>,
    max_articles: usize,
}

impl Aggregator {
    pub fn new(sources: Vec<Arc<dyn Source>>, max_articles: usize) -> Self {
        Self {
            sources,
            max_articles,
        }
    }

    /// Run one aggregation cycle. Never fails: a source that errors or
    /// panics is logged and contributes zero articles.
    #[instrument(level = "info", skip_all, fields(category = ?request.category(), query = ?request.query()))]
    pub async fn load(&self, request: &NewsRequest) -> Vec<Article> {
        let t0 = Instant::now();

        let handles: Vec<_> = self
            .sources
            .iter()
            .map(|source| {
                let source = Arc::clone(source);
                tokio::spawn(async move { source.fetch_articles().await })
            })
            .collect();
        let settled = join_all(handles).await;

        let mut articles = Vec::new();
        for (source, outcome) in self.sources.iter().zip(settled) {
            let result = outcome.unwrap_or_else(|e| {
                Err(NewsError::Task {
                    source_name: source.name().to_string(),
                    reason: e.to_string(),
                })
            });
            match result {
                Ok(mut fetched) => {
                    info!(source = source.name(), count = fetched.len(), "Source settled");
                    articles.append(&mut fetched);
                }
                Err(e) => {
                    warn!(source = source.name(), error = %e, "Source failed; continuing without it");
                }
            }
        }

        let fetched = articles.len();
        let articles = finalize(articles, request, self.max_articles);
        info!(
            fetched,
            returned = articles.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Aggregation complete"
        );
        articles
    }
}

/// Keep only articles matching the request's category and query.
pub fn filter_articles(articles: Vec<Article>, request: &NewsRequest) -> Vec<Article> {
    let needle = request.query().map(str::to_lowercase);
    articles
        .into_iter()
        .filter(|a| request.category().is_none_or(|c| a.category == c))
        .filter(|a| needle.as_deref().is_none_or(|q| a.matches_query(q)))
        .collect()
}

/// Filter, sort newest first and truncate.
pub fn finalize(articles: Vec<Article>, request: &NewsRequest, max_articles: usize) -> Vec<Article> {
    let mut articles = filter_articles(articles, request);
    articles.sort_by(Article::cmp_newest_first);
    articles.truncate(max_articles);
    articles
}

#[cfg(test)]
pub(crate) mod stubs {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub enum Behavior {
        Return(Vec<Article>),
        Fail,
        Panic,
    }

    /// Source returning canned data and counting its invocations.
    pub struct StubSource {
        pub name: &'static str,
        pub behavior: Behavior,
        pub calls: AtomicUsize,
    }

    impl StubSource {
        pub fn new(name: &'static str, behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                name,
                behavior,
                calls: AtomicUsize::new(0),
            })
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Source for StubSource {
        fn name(&self) -> &str {
            self.name
        }

        async fn fetch_articles(&self) -> Result<Vec<Article>, NewsError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behavior {
                Behavior::Return(articles) => Ok(articles.clone()),
                Behavior::Fail => Err(NewsError::Status {
                    url: format!("https://{}.invalid/", self.name),
                    status: 503,
                }),
                Behavior::Panic => panic!("{} blew up", self.name),
            }
        }
    }
}

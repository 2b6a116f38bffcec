//! Load orchestration around the [`Aggregator`].
//!
//! The feed owns the single piece of shared state in the program: whether a
//! load is currently running. A second load requested while one is in
//! flight is answered with [`LoadState::Busy`] and touches no source.

use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info, instrument, warn};

use crate::aggregator::Aggregator;
use crate::models::{Article, NewsRequest};

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load news. Please try again later.";

/// Outcome of one load attempt.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum LoadState {
    /// Another load was already running.
    Busy,
    Loaded {
        articles: Vec<Article>,
        updated_at: DateTime<Local>,
    },
    /// The cycle finished but nothing survived the filters.
    Empty { updated_at: DateTime<Local> },
    Failed { message: String },
}

/// Clears the in-flight flag when dropped.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Produces the final article list for a request.
#[async_trait]
pub trait Collect: Send + Sync + 'static {
    async fn collect(&self, request: &NewsRequest) -> Vec<Article>;
}

#[async_trait]
impl Collect for Aggregator {
    async fn collect(&self, request: &NewsRequest) -> Vec<Article> {
        self.load(request).await
    }
}

pub struct NewsFeed {
    collector: Arc<dyn Collect>,
    loading: AtomicBool,
}

impl NewsFeed {
    pub fn new(collector: impl Collect) -> Self {
        Self {
            collector: Arc::new(collector),
            loading: AtomicBool::new(false),
        }
    }

    /// Run one aggregation cycle unless one is already in flight.
    #[instrument(level = "info", skip_all)]
    pub async fn load(&self, request: &NewsRequest) -> LoadState {
        if self
            .loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("Load already in progress; ignoring request");
            return LoadState::Busy;
        }
        let _guard = InFlight(&self.loading);

        let collector = Arc::clone(&self.collector);
        let request = request.clone();
        let joined = tokio::spawn(async move { collector.collect(&request).await }).await;

        match joined {
            Ok(articles) if articles.is_empty() => {
                info!("No articles matched");
                LoadState::Empty {
                    updated_at: Local::now(),
                }
            }
            Ok(articles) => {
                info!(count = articles.len(), "Articles loaded");
                LoadState::Loaded {
                    articles,
                    updated_at: Local::now(),
                }
            }
            Err(e) => {
                error!(error = %e, "Error fetching news");
                LoadState::Failed {
                    message: LOAD_FAILED_MESSAGE.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::stubs::{Behavior, StubSource};
    use crate::models::Category;
    use crate::models::fixtures::article;
    use crate::sources::Source;
    use tokio::sync::Notify;

    fn feed_with(sources: Vec<Arc<dyn Source>>) -> NewsFeed {
        NewsFeed::new(Aggregator::new(sources, 20))
    }

    #[tokio::test]
    async fn test_loaded_state_carries_articles() {
        let stub = StubSource::new(
            "a",
            Behavior::Return(vec![article("Rust news", Some(1), Category::Technology)]),
        );
        let feed = feed_with(vec![stub]);
        let req = NewsRequest::new(None, Some("rust")).unwrap();

        match feed.load(&req).await {
            LoadState::Loaded { articles, .. } => assert_eq!(articles.len(), 1),
            other => panic!("unexpected state {other:?}"),
        }
        assert!(!feed.loading.load(Ordering::SeqCst));
    }

    struct Exploding;

    #[async_trait]
    impl Collect for Exploding {
        async fn collect(&self, _request: &NewsRequest) -> Vec<Article> {
            panic!("aggregation blew up");
        }
    }

    #[tokio::test]
    async fn test_aggregation_panic_is_failed_state() {
        let feed = NewsFeed::new(Exploding);

        match feed.load(&NewsRequest::default()).await {
            LoadState::Failed { message } => assert_eq!(message, LOAD_FAILED_MESSAGE),
            other => panic!("unexpected state {other:?}"),
        }
        assert!(!feed.loading.load(Ordering::SeqCst));

        // The flag was released, so the next load runs instead of reporting Busy.
        assert!(matches!(
            feed.load(&NewsRequest::default()).await,
            LoadState::Failed { .. }
        ));
    }

    #[tokio::test]
    async fn test_all_sources_failing_is_empty_not_failed() {
        let feed = feed_with(vec![
            StubSource::new("a", Behavior::Fail),
            StubSource::new("b", Behavior::Fail),
            StubSource::new("c", Behavior::Fail),
        ]);
        let state = feed.load(&NewsRequest::default()).await;
        assert!(matches!(state, LoadState::Empty { .. }));
    }

    #[tokio::test]
    async fn test_filtered_to_nothing_is_empty() {
        let feed = feed_with(vec![StubSource::new(
            "a",
            Behavior::Return(vec![article("A", Some(1), Category::Technology)]),
        )]);
        let req = NewsRequest::new(Some(Category::Health), None).unwrap();
        assert!(matches!(feed.load(&req).await, LoadState::Empty { .. }));
    }

    /// Source that blocks until released, so a load can be held in flight.
    struct GatedSource {
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl Source for GatedSource {
        fn name(&self) -> &str {
            "gated"
        }

        async fn fetch_articles(&self) -> Result<Vec<Article>, crate::error::NewsError> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok(vec![article("Late", Some(1), Category::General)])
        }
    }

    #[tokio::test]
    async fn test_reentrant_load_is_busy() {
        let gated = Arc::new(GatedSource {
            entered: Notify::new(),
            release: Notify::new(),
        });
        let counter = StubSource::new("counter", Behavior::Return(vec![]));
        let feed = Arc::new(feed_with(vec![gated.clone(), counter.clone()]));

        let first = {
            let feed = Arc::clone(&feed);
            tokio::spawn(async move { feed.load(&NewsRequest::default()).await })
        };
        gated.entered.notified().await;
        assert!(feed.loading.load(Ordering::SeqCst));

        let second = feed.load(&NewsRequest::default()).await;
        assert!(matches!(second, LoadState::Busy));

        gated.release.notify_one();
        let first = first.await.unwrap();
        assert!(matches!(first, LoadState::Loaded { .. }));
        assert_eq!(counter.calls(), 1);
        assert!(!feed.loading.load(Ordering::SeqCst));
    }

    #[test]
    fn test_state_serializes_with_tag() {
        let json = serde_json::to_value(LoadState::Failed {
            message: "boom".into(),
        })
        .unwrap();
        assert_eq!(json["state"], "failed");
        assert_eq!(json["message"], "boom");
    }
}

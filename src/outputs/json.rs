//! JSON snapshot of one aggregation cycle.
//!
//! The snapshot carries the raw [`LoadState`] rather than the rendered
//! view, so consumers get ISO-8601 timestamps and numeric scores.
//!
//! ```json
//! {
//!   "category": "science",
//!   "query": null,
//!   "result": { "state": "loaded", "articles": [ ... ], "updated_at": "..." }
//! }
//! ```

use serde::Serialize;

use crate::feed::LoadState;
use crate::models::{Category, NewsRequest};

#[derive(Debug, Serialize)]
struct Snapshot<'a> {
    category: Option<Category>,
    query: Option<&'a str>,
    result: &'a LoadState,
}

/// Serialize the request and its outcome as pretty-printed JSON.
pub fn state_to_json(request: &NewsRequest, state: &LoadState) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&Snapshot {
        category: request.category(),
        query: request.query(),
        result: state,
    })
}

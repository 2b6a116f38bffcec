//! View model: a pure description of what the page should show.
//!
//! [`render`] maps a [`LoadState`] to a [`View`]; the text, Markdown and
//! JSON writers only ever look at the `View` (or the raw state), never at
//! the sources.

use chrono::{DateTime, Local, TimeZone};
use itertools::Itertools;
use serde::Serialize;
use std::fmt;

use crate::feed::LoadState;
use crate::models::{Article, Category};

const NO_DESCRIPTION: &str = "Click to read more...";
const UNKNOWN_DATE: &str = "Unknown date";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    /// `{emoji} {CATEGORY}`.
    pub category_label: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub image_url: String,
    pub source_name: String,
    pub published: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    Loading,
    NoResults {
        heading: String,
        hint: String,
    },
    Error {
        heading: String,
        message: String,
        retry_hint: String,
    },
    Cards {
        count_label: String,
        last_updated: String,
        cards: Vec<Card>,
    },
}

/// `May 6, 2025, 12:30 PM`
pub fn format_published<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    dt.format("%b %-d, %Y, %I:%M %p").to_string()
}

/// `Last updated: 03:04:05 PM`
pub fn format_last_updated<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    format!("Last updated: {}", dt.format("%I:%M:%S %p"))
}

/// The requested category wins over the article's own label.
fn card(article: &Article, requested: Option<Category>) -> Card {
    let category = requested.unwrap_or(article.category);
    Card {
        category_label: format!("{} {}", category.emoji(), category.as_str().to_uppercase()),
        title: article.title.clone(),
        description: if article.description.trim().is_empty() {
            NO_DESCRIPTION.to_string()
        } else {
            article.description.clone()
        },
        url: article.url.clone(),
        image_url: article.image_url.clone(),
        source_name: article.source_name.clone(),
        published: article
            .published_at
            .map(|t| format_published(&t.with_timezone(&Local)))
            .unwrap_or_else(|| UNKNOWN_DATE.to_string()),
    }
}

pub fn render(state: &LoadState, requested: Option<Category>) -> View {
    match state {
        LoadState::Busy => View::Loading,
        LoadState::Empty { .. } => View::NoResults {
            heading: "No articles found".to_string(),
            hint: "Try adjusting your search terms or browse different categories.".to_string(),
        },
        LoadState::Failed { message } => View::Error {
            heading: "Oops! Something went wrong".to_string(),
            message: message.clone(),
            retry_hint: "Run the command again to retry.".to_string(),
        },
        LoadState::Loaded {
            articles,
            updated_at,
        } => View::Cards {
            count_label: format!("{} articles loaded", articles.len()),
            last_updated: format_last_updated(updated_at),
            cards: articles.iter().map(|a| card(a, requested)).collect(),
        },
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.category_label)?;
        writeln!(f, "{}", self.title)?;
        if self.description != self.title {
            writeln!(f, "  {}", self.description)?;
        }
        writeln!(f, "  {} | {}", self.source_name, self.published)?;
        write!(f, "  {}", self.url)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Loading => write!(f, "Loading..."),
            View::NoResults { heading, hint } => write!(f, "📭 {heading}\n{hint}"),
            View::Error {
                heading,
                message,
                retry_hint,
            } => write!(f, "⚠️ {heading}\n{message}\n{retry_hint}"),
            View::Cards {
                count_label,
                last_updated,
                cards,
            } => {
                writeln!(f, "{count_label} · {last_updated}")?;
                writeln!(f)?;
                write!(f, "{}", cards.iter().join("\n\n"))
            }
        }
    }
}

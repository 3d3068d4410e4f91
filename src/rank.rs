// src/rank.rs
//! Ranking: merge all platforms and keep the top K by raw score.
//!
//! Order is score descending (so strongly positive items come before strongly
//! negative ones, not "most extreme first"). The sort is stable, so equal
//! scores keep their input order.

use serde::Serialize;

use crate::classify::{ClassifiedRecord, RecordDate};
use crate::ingest::types::Platform;
use crate::sentiment::SentimentLabel;

pub const DEFAULT_TOP_K: usize = 5;
pub const SHORT_TITLE_CHARS: usize = 100;
const ELLIPSIS: &str = "...";

/// Entry for the report list: one-line summary plus an expandable detail view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub rank: usize, // 1-based
    pub platform: Platform,
    pub short_title: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub source: String,
    pub date: RecordDate,
    pub label: SentimentLabel,
    pub score: f64,
}

impl RankedEntry {
    fn from_record(rank: usize, r: &ClassifiedRecord) -> Self {
        Self {
            rank,
            platform: r.platform(),
            short_title: short_title(r.title()),
            title: r.title().to_string(),
            description: r.description().to_string(),
            url: r.url().to_string(),
            source: r.source().to_string(),
            date: r.date(),
            label: r.label(),
            score: r.score(),
        }
    }

    /// `✅ [News] [Short title](https://...)`
    pub fn summary_line(&self) -> String {
        format!(
            "{} [{}] [{}]({})",
            self.label.icon(),
            self.platform,
            self.short_title,
            self.url
        )
    }

    pub fn detail(&self) -> String {
        format!(
            "Full Title: {}\nFull Description: {}\nSentiment: {} ({:.2})",
            self.title, self.description, self.label, self.score
        )
    }

    pub fn caption(&self) -> String {
        format!("Published: {} | Source: {}", self.date, self.source)
    }
}

/// First 100 characters plus `...` when the title is longer; unchanged otherwise.
pub fn short_title(title: &str) -> String {
    match title.char_indices().nth(SHORT_TITLE_CHARS) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &title[..cut]),
        None => title.to_string(),
    }
}

/// Top `k` of the combined list (news first, then social, as given).
/// `k` beyond the list length returns everything.
pub fn rank_top_k<'a, I>(records: I, k: usize) -> Vec<RankedEntry>
where
    I: IntoIterator<Item = &'a ClassifiedRecord>,
{
    let mut all: Vec<&ClassifiedRecord> = records.into_iter().collect();
    // Stable: equal scores keep input order.
    all.sort_by(|a, b| b.score().total_cmp(&a.score()));

    all.into_iter()
        .take(k)
        .enumerate()
        .map(|(i, r)| RankedEntry::from_record(i + 1, r))
        .collect()
}

// src/ingest/providers/reddit.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::DateTime;
use metrics::histogram;
use serde::Deserialize;

use crate::ingest::types::{FetchRequest, Platform, RawFields, SourceProvider};

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
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
    selftext: Option<String>,
    created_utc: Option<f64>,
    url: Option<String>,
    subreddit: Option<String>,
}

/// Unix seconds → naive ISO-8601 (`2024-05-02T08:00:00`), UTC.
/// Out-of-range values yield `None` and end up as an empty timestamp.
fn unix_to_iso(ts: f64) -> Option<String> {
    if !ts.is_finite() {
        return None;
    }
    DateTime::from_timestamp(ts.trunc() as i64, 0)
        .map(|dt| dt.naive_utc().format("%Y-%m-%dT%H:%M:%S").to_string())
}

/// Social provider backed by a captured subreddit search listing (JSON).
pub struct RedditProvider {
    pub body: String,
}

impl RedditProvider {
    pub fn from_fixture(content: &str) -> Self {
        Self {
            body: content.to_string(),
        }
    }
}

fn to_fields(p: Post) -> RawFields {
    let mut f = RawFields::with_capacity(5);
    f.insert("title".into(), p.title);
    // Link posts carry an empty selftext; that is a present-but-empty description.
    f.insert("description".into(), p.selftext);
    f.insert("publishedAt".into(), p.created_utc.and_then(unix_to_iso));
    f.insert("url".into(), p.url);
    f.insert("source".into(), p.subreddit);
    f
}

#[async_trait]
impl SourceProvider for RedditProvider {
    async fn fetch(&self, req: &FetchRequest) -> Result<Vec<RawFields>> {
        let t0 = std::time::Instant::now();

        let listing: Listing =
            serde_json::from_str(&self.body).context("parsing reddit listing json")?;
        let out: Vec<RawFields> = listing
            .data
            .children
            .into_iter()
            .take(req.max_records)
            .map(|c| to_fields(c.data))
            .collect();

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("ingest_parse_ms").record(ms);

        Ok(out)
    }

    fn name(&self) -> &'static str {
        "Reddit"
    }

    fn platform(&self) -> Platform {
        Platform::Social
    }
}

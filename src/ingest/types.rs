// src/ingest/types.rs
use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Raw key/value record as handed over by a fetch collaborator.
/// A key that is missing and a key mapped to `None` are treated the same.
pub type RawFields = HashMap<String, Option<String>>;

/// Origin of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    News,
    Social,
}

impl Platform {
    pub fn label(self) -> &'static str {
        match self {
            Platform::News => "News",
            Platform::Social => "Social",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Uniform record after normalization. Every text field is present (maybe empty).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub title: String,
    pub description: String,
    pub published_at: String, // source-specific format, may be unparsable
    pub url: String,
    pub source: String, // e.g. "Reuters", "r/sneakers"
    pub platform: Platform,
}

impl RawRecord {
    /// Text handed to the classifier and to the corpus: title, one space, description.
    pub fn text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }
}

/// Parameters forwarded to fetch collaborators. The pipeline never validates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    pub brand: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub max_records: usize,
}

#[async_trait::async_trait]
pub trait SourceProvider: Send + Sync {
    async fn fetch(&self, req: &FetchRequest) -> Result<Vec<RawFields>>;
    fn name(&self) -> &'static str;
    fn platform(&self) -> Platform;
}

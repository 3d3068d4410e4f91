//! # Classification
//! Turns normalized records into immutable `ClassifiedRecord`s: one output per
//! input, same order, with a sentiment and a calendar date (or `Undated`).

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt;

use crate::ingest::types::{Platform, RawRecord};
use crate::outcome::{Outcome, Warning};
use crate::sentiment::{PolarityModel, Sentiment, SentimentClassifier, SentimentLabel};

/// Calendar date of a record, or the sentinel for an unparseable timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum RecordDate {
    Dated(NaiveDate),
    Undated,
}

impl RecordDate {
    pub fn as_date(self) -> Option<NaiveDate> {
        match self {
            RecordDate::Dated(d) => Some(d),
            RecordDate::Undated => None,
        }
    }
}

impl fmt::Display for RecordDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordDate::Dated(d) => write!(f, "{d}"),
            RecordDate::Undated => f.write_str("undated"),
        }
    }
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a provider timestamp into its calendar date.
///
/// Zoned timestamps keep the date in their own offset
/// (`2024-05-01T23:30:00-05:00` is May 1st).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.date_naive());
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Date resolution as an outcome: unparseable → `Undated` plus a warning.
pub fn resolve_date(raw: &str) -> Outcome<RecordDate> {
    match parse_date(raw) {
        Some(d) => Outcome::Clean(RecordDate::Dated(d)),
        None => Outcome::degraded(
            RecordDate::Undated,
            Warning::UnparseableDate {
                raw: raw.to_string(),
            },
        ),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedRecord {
    #[serde(flatten)]
    raw: RawRecord,
    sentiment_label: SentimentLabel,
    sentiment_score: f64,
    date: RecordDate,
}

impl ClassifiedRecord {
    /// The label is always derived from `score`, never supplied.
    pub fn new(raw: RawRecord, score: f64, date: RecordDate) -> Self {
        Self::from_sentiment(raw, Sentiment::from_score(score), date)
    }

    fn from_sentiment(raw: RawRecord, s: Sentiment, date: RecordDate) -> Self {
        Self {
            raw,
            sentiment_label: s.label,
            sentiment_score: s.score,
            date,
        }
    }

    pub fn raw(&self) -> &RawRecord {
        &self.raw
    }
    pub fn title(&self) -> &str {
        &self.raw.title
    }
    pub fn description(&self) -> &str {
        &self.raw.description
    }
    pub fn url(&self) -> &str {
        &self.raw.url
    }
    pub fn source(&self) -> &str {
        &self.raw.source
    }
    pub fn platform(&self) -> Platform {
        self.raw.platform
    }
    pub fn label(&self) -> SentimentLabel {
        self.sentiment_label
    }
    pub fn score(&self) -> f64 {
        self.sentiment_score
    }
    pub fn date(&self) -> RecordDate {
        self.date
    }
}

/// Classify one record: sentiment of `title + " " + description`, plus its date.
pub fn classify_record<M: PolarityModel>(
    raw: RawRecord,
    classifier: &SentimentClassifier<M>,
) -> Outcome<ClassifiedRecord> {
    let mut warnings = Vec::new();
    let sentiment = classifier.classify(&raw.text()).drain_into(&mut warnings);
    let date = resolve_date(&raw.published_at).drain_into(&mut warnings);
    Outcome::with_warnings(
        ClassifiedRecord::from_sentiment(raw, sentiment, date),
        warnings,
    )
}

pub fn classify_batch<M: PolarityModel>(
    records: Vec<RawRecord>,
    classifier: &SentimentClassifier<M>,
) -> Outcome<Vec<ClassifiedRecord>> {
    let mut warnings = Vec::new();
    let out = records
        .into_iter()
        .map(|r| classify_record(r, classifier).drain_into(&mut warnings))
        .collect();
    Outcome::with_warnings(out, warnings)
}

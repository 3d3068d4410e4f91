//! # Aggregator
//! Per-platform label tallies and mean score. Platforms are never blended:
//! call once per platform and keep the results apart.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::classify::ClassifiedRecord;
use crate::ingest::types::Platform;
use crate::outcome::{Outcome, Warning};
use crate::sentiment::SentimentLabel;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceMetrics {
    pub platform: Platform,
    pub total: usize,
    pub positive_count: usize,
    pub negative_count: usize,
    pub neutral_count: usize,
    /// 0.0 for an empty set.
    pub average_score: f64,
}

impl SourceMetrics {
    pub fn empty(platform: Platform) -> Self {
        Self {
            platform,
            total: 0,
            positive_count: 0,
            negative_count: 0,
            neutral_count: 0,
            average_score: 0.0,
        }
    }
}

/// Tally `records` (all from `platform`).
///
/// An empty input is not an error: zeros and a 0.0 average, reported as an
/// `EmptySourceSet` degraded outcome.
pub fn aggregate(platform: Platform, records: &[ClassifiedRecord]) -> Outcome<SourceMetrics> {
    if records.is_empty() {
        return Outcome::degraded(
            SourceMetrics::empty(platform),
            Warning::EmptySourceSet { platform },
        );
    }

    debug_assert!(records.iter().all(|r| r.platform() == platform));

    let mut positive = 0usize;
    let mut negative = 0usize;
    let mut sum = 0.0f64;
    for r in records {
        match r.label() {
            SentimentLabel::Positive => positive += 1,
            SentimentLabel::Negative => negative += 1,
            SentimentLabel::Neutral => {}
        }
        sum += r.score();
    }

    let total = records.len();
    Outcome::Clean(SourceMetrics {
        platform,
        total,
        positive_count: positive,
        negative_count: negative,
        neutral_count: total - positive - negative,
        average_score: sum / total as f64,
    })
}

/// Label → count for pie-style rendering. Labels with no records are omitted.
pub fn label_distribution(records: &[ClassifiedRecord]) -> BTreeMap<SentimentLabel, usize> {
    let mut out = BTreeMap::new();
    for r in records {
        *out.entry(r.label()).or_insert(0) += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::RecordDate;
    use crate::ingest::types::RawRecord;

    fn rec(score: f64) -> ClassifiedRecord {
        let raw = RawRecord {
            title: format!("t{score}"),
            description: String::new(),
            published_at: String::new(),
            url: String::new(),
            source: String::new(),
            platform: Platform::Social,
        };
        ClassifiedRecord::new(raw, score, RecordDate::Undated)
    }

    #[test]
    fn counts_and_mean() {
        let rs: Vec<_> = [0.8, -0.8, 0.05, 0.1].into_iter().map(rec).collect();
        let m = aggregate(Platform::Social, &rs);
        assert!(!m.is_degraded());
        let m = m.value();
        assert_eq!(m.positive_count, 1);
        assert_eq!(m.negative_count, 1);
        assert_eq!(m.neutral_count, 2);
        assert_eq!(m.total, 4);
        assert!((m.average_score - 0.0375).abs() < 1e-12);
    }

    #[test]
    fn nan_score_does_not_poison_the_mean() {
        let rs: Vec<_> = [0.6, f64::NAN, -0.3].into_iter().map(rec).collect();
        let v = aggregate(Platform::Social, &rs).into_parts().0;
        assert_eq!(v.neutral_count, 1);
        assert!((v.average_score - 0.1).abs() < 1e-12);
    }

    #[test]
    fn empty_set_is_zero_not_nan() {
        let m = aggregate(Platform::News, &[]);
        assert_eq!(
            m.warnings(),
            &[Warning::EmptySourceSet {
                platform: Platform::News
            }]
        );
        let v = m.value();
        assert_eq!(v.average_score, 0.0);
        assert_eq!(v.positive_count, 0);
        assert_eq!(v.negative_count, 0);
        assert_eq!(v.neutral_count, 0);
    }

    #[test]
    fn distribution_omits_missing_labels() {
        let rs: Vec<_> = [0.5, 0.7, 0.0].into_iter().map(rec).collect();
        let dist = label_distribution(&rs);
        assert_eq!(dist.get(&SentimentLabel::Positive), Some(&2));
        assert_eq!(dist.get(&SentimentLabel::Neutral), Some(&1));
        assert_eq!(dist.get(&SentimentLabel::Negative), None);
    }
}

//! # Trend
//! Mean sentiment per calendar day across all platforms.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::classify::ClassifiedRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub mean_score: f64,
}

/// One point per distinct date among dated records, ascending.
/// Undated records are skipped entirely; none dated → empty.
pub fn build_trend<'a, I>(records: I) -> Vec<TrendPoint>
where
    I: IntoIterator<Item = &'a ClassifiedRecord>,
{
    let mut buckets: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for r in records {
        let Some(date) = r.date().as_date() else {
            continue;
        };
        let slot = buckets.entry(date).or_insert((0.0, 0));
        slot.0 += r.score();
        slot.1 += 1;
    }

    buckets
        .into_iter()
        .map(|(date, (sum, n))| TrendPoint {
            date,
            mean_score: sum / n as f64,
        })
        .collect()
}

//! # Pipeline Engine
//! Pure, testable logic that maps two raw batches (news, social) → `Report`.
//! No I/O, suitable for unit tests and offline runs.
//!
//! Order: normalize → classify (per record) → {aggregate, trend, rank, corpus}
//! over the same classified pool. Every degraded path lands in
//! `Report::warnings`; nothing here returns an error.

use metrics::{counter, gauge};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::aggregate::{aggregate, label_distribution, SourceMetrics};
use crate::classify::{classify_batch, ClassifiedRecord};
use crate::ingest::types::{Platform, RawFields};
use crate::ingest::{ensure_metrics_described, normalize_batch};
use crate::insight::SummaryInputs;
use crate::outcome::Warning;
use crate::rank::{rank_top_k, RankedEntry, DEFAULT_TOP_K};
use crate::sentiment::{LexiconModel, PolarityModel, SentimentClassifier, SentimentLabel};
use crate::trend::{build_trend, TrendPoint};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzeOptions {
    pub brand: String,
    pub top_k: usize,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            brand: String::new(),
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// Per-platform slice of the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformReport {
    pub metrics: SourceMetrics,
    pub distribution: BTreeMap<SentimentLabel, usize>,
    pub records: Vec<ClassifiedRecord>,
}

impl PlatformReport {
    fn build(platform: Platform, records: Vec<ClassifiedRecord>, warnings: &mut Vec<Warning>) -> Self {
        let metrics = aggregate(platform, &records).drain_into(warnings);
        let distribution = label_distribution(&records);
        Self {
            metrics,
            distribution,
            records,
        }
    }
}

/// Everything the presentation collaborators consume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub news: PlatformReport,
    pub social: PlatformReport,
    pub trend: Vec<TrendPoint>,
    /// All `title + " " + description`, news first, joined by single spaces.
    pub corpus: String,
    pub top: Vec<RankedEntry>,
    pub summary: SummaryInputs,
    pub warnings: Vec<Warning>,
}

impl Report {
    /// Combined pool in ranking order: news records, then social records.
    pub fn combined(&self) -> impl Iterator<Item = &ClassifiedRecord> {
        self.news.records.iter().chain(self.social.records.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.news.records.is_empty() && self.social.records.is_empty()
    }

    /// Label tallies across both platforms.
    pub fn combined_distribution(&self) -> BTreeMap<SentimentLabel, usize> {
        let mut out = self.news.distribution.clone();
        for (label, n) in &self.social.distribution {
            *out.entry(*label).or_insert(0) += n;
        }
        out
    }
}

/// Run the full pipeline with the default lexicon model.
pub fn analyze(news: &[RawFields], social: &[RawFields], opts: &AnalyzeOptions) -> Report {
    analyze_with(&SentimentClassifier::<LexiconModel>::new(), news, social, opts)
}

/// Run the full pipeline with an injected polarity model.
pub fn analyze_with<M: PolarityModel>(
    classifier: &SentimentClassifier<M>,
    news: &[RawFields],
    social: &[RawFields],
    opts: &AnalyzeOptions,
) -> Report {
    ensure_metrics_described();
    let mut warnings = Vec::new();

    let news_records = classify_platform(classifier, news, Platform::News, &mut warnings);
    let social_records = classify_platform(classifier, social, Platform::Social, &mut warnings);

    let news = PlatformReport::build(Platform::News, news_records, &mut warnings);
    let social = PlatformReport::build(Platform::Social, social_records, &mut warnings);

    let combined = || news.records.iter().chain(social.records.iter());
    let trend = build_trend(combined());
    let top = rank_top_k(combined(), opts.top_k);
    let corpus = combined()
        .map(|r| r.raw().text())
        .collect::<Vec<_>>()
        .join(" ");
    let summary = SummaryInputs::from_metrics(&opts.brand, &news.metrics, &social.metrics);

    let total = news.records.len() + social.records.len();
    counter!("pipeline_records_total").increment(total as u64);
    counter!("pipeline_degraded_total").increment(warnings.len() as u64);
    gauge!("pipeline_last_run_ts").set(chrono::Utc::now().timestamp() as f64);

    tracing::info!(
        target: "pipeline",
        model = classifier.model_name(),
        news = news.records.len(),
        social = social.records.len(),
        trend_points = trend.len(),
        top = top.len(),
        warnings = warnings.len(),
        "analysis finished"
    );

    Report {
        news,
        social,
        trend,
        corpus,
        top,
        summary,
        warnings,
    }
}

fn classify_platform<M: PolarityModel>(
    classifier: &SentimentClassifier<M>,
    batch: &[RawFields],
    platform: Platform,
    warnings: &mut Vec<Warning>,
) -> Vec<ClassifiedRecord> {
    let raw = normalize_batch(batch, platform).drain_into(warnings);
    let (records, mut w) = classify_batch(raw, classifier).into_parts();

    for warn in &w {
        if let Warning::ClassificationFailure { reason } = warn {
            tracing::warn!(platform = %platform, reason = %reason, "classification degraded to neutral");
        }
    }
    warnings.append(&mut w);
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::ModelError;

    /// Scores each text by looking up its title in a fixed table.
    struct Table(Vec<(&'static str, f64)>);

    impl PolarityModel for Table {
        fn polarity(&self, text: &str) -> Result<f64, ModelError> {
            self.0
                .iter()
                .find(|(t, _)| text.starts_with(t))
                .map(|(_, s)| *s)
                .ok_or_else(|| ModelError::Engine(format!("no score for {text:?}")))
        }
        fn name(&self) -> &'static str {
            "table"
        }
    }

    fn raw(title: &str, published_at: &str) -> RawFields {
        let mut f = RawFields::new();
        f.insert("title".into(), Some(title.into()));
        f.insert("description".into(), Some(format!("about {title}")));
        f.insert("publishedAt".into(), Some(published_at.into()));
        f.insert("url".into(), Some(format!("https://example.test/{title}")));
        f.insert("source".into(), Some("Desk".into()));
        f
    }

    #[test]
    fn model_failure_is_a_warning_not_an_abort() {
        let c = SentimentClassifier::with_model(Table(vec![("known", 0.6)]));
        let news = vec![raw("known", "2024-05-01"), raw("mystery", "2024-05-01")];
        let r = analyze_with(&c, &news, &[], &AnalyzeOptions::default());

        assert_eq!(r.news.records.len(), 2);
        assert_eq!(r.news.records[1].score(), 0.0);
        assert_eq!(r.news.records[1].label(), SentimentLabel::Neutral);
        assert!(r
            .warnings
            .iter()
            .any(|w| matches!(w, Warning::ClassificationFailure { .. })));
        // social side was empty
        assert!(r
            .warnings
            .iter()
            .any(|w| matches!(w, Warning::EmptySourceSet { platform: Platform::Social })));
    }

    #[test]
    fn corpus_joins_news_then_social() {
        let c = SentimentClassifier::with_model(Table(vec![("a", 0.0), ("b", 0.0)]));
        let r = analyze_with(
            &c,
            &[raw("a", "")],
            &[raw("b", "")],
            &AnalyzeOptions::default(),
        );
        assert_eq!(r.corpus, "a about a b about b");

        let pool: Vec<_> = r.combined().map(|c| (c.title(), c.platform())).collect();
        assert_eq!(pool, vec![("a", Platform::News), ("b", Platform::Social)]);
    }

    #[test]
    fn empty_run_is_well_typed() {
        let r = analyze(&[], &[], &AnalyzeOptions::default());
        assert!(r.is_empty());
        assert!(r.trend.is_empty());
        assert!(r.top.is_empty());
        assert_eq!(r.corpus, "");
        assert_eq!(r.summary.avg_news, 0.0);
        assert_eq!(r.warnings.len(), 2);
    }
}

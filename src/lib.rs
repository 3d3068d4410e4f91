// src/lib.rs
// Public library surface for integration tests and the demo binary.

pub mod aggregate;
pub mod classify;
pub mod engine;
pub mod ingest;
pub mod insight;
pub mod outcome;
pub mod rank;
pub mod sentiment;
pub mod telemetry;
pub mod trend;

// ---- Re-exports for stable public API ----
pub use crate::engine::{analyze, analyze_with, AnalyzeOptions, Report};
pub use crate::ingest::config::PipelineConfig;
pub use crate::ingest::types::{FetchRequest, Platform, RawFields, RawRecord, SourceProvider};
pub use crate::outcome::{Outcome, Warning};

use tracing::info;

/// Fetch both platforms through the injected providers, then run the pipeline.
///
/// Provider failures are logged and treated as empty batches, so this always
/// yields a complete `Report`.
///
/// ```ignore
/// let news = NewsApiProvider::from_fixture(&news_json);
/// let social = RedditProvider::from_fixture(&reddit_json);
/// let report = brand_sentiment::run(&news, &social, &PipelineConfig::default()).await;
/// ```
pub async fn run(
    news: &dyn SourceProvider,
    social: &dyn SourceProvider,
    cfg: &PipelineConfig,
) -> Report {
    let (news_raw, social_raw) = ingest::fetch_all(
        news,
        &cfg.news_request(),
        social,
        &cfg.social_request(),
    )
    .await;

    if news_raw.is_empty() && social_raw.is_empty() {
        info!(brand = %cfg.brand, "no results found");
    }

    let opts = AnalyzeOptions {
        brand: cfg.brand.clone(),
        top_k: cfg.top_k,
    };
    analyze(&news_raw, &social_raw, &opts)
}

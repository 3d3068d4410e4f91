// src/ingest/mod.rs
pub mod config;
pub mod providers;
pub mod types;

use crate::ingest::types::{FetchRequest, Platform, RawFields, RawRecord, SourceProvider};
use crate::outcome::{Field, Outcome, Warning};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up when a recorder is installed).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "ingest_records_total",
            "Raw records returned by fetch collaborators."
        );
        describe_counter!(
            "ingest_provider_errors_total",
            "Provider fetch/parse errors."
        );
        describe_histogram!("ingest_parse_ms", "Provider parse time in milliseconds.");
        describe_counter!(
            "pipeline_records_total",
            "Records classified by the pipeline."
        );
        describe_counter!(
            "pipeline_degraded_total",
            "Warnings raised while running the pipeline."
        );
        describe_gauge!(
            "pipeline_last_run_ts",
            "Unix ts when the pipeline last ran."
        );
    });
}

/// Look up a raw field; absent keys and `None` values both come back as `None`.
fn take(fields: &RawFields, field: Field) -> Option<String> {
    fields.get(field.key()).cloned().flatten()
}

/// Map one raw key/value record into the uniform schema.
///
/// Never fails: every absent field becomes `""` and is reported as a
/// `MissingField` warning on the returned outcome.
pub fn normalize_record(fields: &RawFields, platform: Platform) -> Outcome<RawRecord> {
    let mut warnings = Vec::new();
    let mut get = |field: Field| {
        take(fields, field).unwrap_or_else(|| {
            warnings.push(Warning::MissingField { field });
            String::new()
        })
    };

    let record = RawRecord {
        title: get(Field::Title),
        description: get(Field::Description),
        published_at: get(Field::PublishedAt),
        url: get(Field::Url),
        source: get(Field::Source),
        platform,
    };
    Outcome::with_warnings(record, warnings)
}

/// Normalize a whole batch from one platform, preserving input order.
pub fn normalize_batch(batch: &[RawFields], platform: Platform) -> Outcome<Vec<RawRecord>> {
    let mut warnings = Vec::new();
    let records = batch
        .iter()
        .map(|f| normalize_record(f, platform).drain_into(&mut warnings))
        .collect();
    Outcome::with_warnings(records, warnings)
}

/// Fetch from one provider. Errors are logged and counted; the caller gets an
/// empty batch so the run continues.
pub async fn fetch_one(provider: &dyn SourceProvider, req: &FetchRequest) -> Vec<RawFields> {
    ensure_metrics_described();

    match provider.fetch(req).await {
        Ok(v) => {
            counter!("ingest_records_total", "platform" => provider.platform().label())
                .increment(v.len() as u64);
            tracing::debug!(
                target: "ingest",
                provider = provider.name(),
                records = v.len(),
                "provider fetched"
            );
            v
        }
        Err(e) => {
            tracing::warn!(error = ?e, provider = provider.name(), "provider error");
            counter!("ingest_provider_errors_total").increment(1);
            Vec::new()
        }
    }
}

/// Fetch news and social batches concurrently.
/// Returns `(news, social)` raw batches; see `fetch_one` for error policy.
pub async fn fetch_all(
    news: &dyn SourceProvider,
    news_req: &FetchRequest,
    social: &dyn SourceProvider,
    social_req: &FetchRequest,
) -> (Vec<RawFields>, Vec<RawFields>) {
    tokio::join!(fetch_one(news, news_req), fetch_one(social, social_req))
}

//! Demo that runs the pipeline over captured provider payloads and prints the report.
//!
//! Env:
//!   PULSE_NEWS_FIXTURE / PULSE_SOCIAL_FIXTURE  payload paths (default: tests/fixtures/*)
//!   PULSE_INSIGHT_MOCK                         fixed narrative text (otherwise no insight)
//!   PULSE_METRICS=1                            print Prometheus text at the end
//!   PULSE_DEV_LOG=1                            enable compact tracing output

use anyhow::{Context, Result};
use brand_sentiment::ingest::config::load_config_default;
use brand_sentiment::ingest::providers::{NewsApiProvider, RedditProvider};
use brand_sentiment::insight::{request_insight, DisabledClient, DynInsightClient, MockClient};
use brand_sentiment::telemetry::Metrics;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_NEWS_FIXTURE: &str = "tests/fixtures/newsapi_everything.json";
const DEFAULT_SOCIAL_FIXTURE: &str = "tests/fixtures/reddit_search.json";

fn env_flag(name: &str) -> bool {
    std::env::var(name).ok().is_some_and(|v| v == "1")
}

/// Compact tracing logs, only when PULSE_DEV_LOG=1.
fn enable_dev_tracing() {
    if !env_flag("PULSE_DEV_LOG") {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("brand_sentiment=info,pipeline=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_target(false))
        .init();
}

fn read_fixture(var: &str, default: &str) -> Result<String> {
    let path = std::env::var(var).unwrap_or_else(|_| default.to_string());
    std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    enable_dev_tracing();

    let cfg = load_config_default()?;
    let metrics = if env_flag("PULSE_METRICS") {
        Some(Metrics::init(cfg.top_k)?)
    } else {
        None
    };

    let news = NewsApiProvider::from_fixture(&read_fixture(
        "PULSE_NEWS_FIXTURE",
        DEFAULT_NEWS_FIXTURE,
    )?);
    let social = RedditProvider::from_fixture(&read_fixture(
        "PULSE_SOCIAL_FIXTURE",
        DEFAULT_SOCIAL_FIXTURE,
    )?);

    let report = brand_sentiment::run(&news, &social, &cfg).await;
    if report.is_empty() {
        println!("No results found for '{}'.", cfg.brand);
        return Ok(());
    }

    println!("## Metrics");
    for m in [&report.news.metrics, &report.social.metrics] {
        println!(
            "{:<7} avg {:>5.2} | pos {} | neg {} | neutral {}",
            m.platform, m.average_score, m.positive_count, m.negative_count, m.neutral_count
        );
    }

    println!("\n## Trend");
    for p in &report.trend {
        println!("{}  {:+.2}", p.date, p.mean_score);
    }
    let undated = report
        .combined()
        .filter(|r| r.date().as_date().is_none())
        .count();
    if undated > 0 {
        println!("({undated} undated record(s) left out of the trend)");
    }

    println!("\n## Top {} Posts", report.top.len());
    for e in &report.top {
        println!("### {}", e.summary_line());
        println!("{}", e.detail());
        println!("{}\n---", e.caption());
    }

    let insight: DynInsightClient = match std::env::var("PULSE_INSIGHT_MOCK") {
        Ok(fixed) => Arc::new(MockClient { fixed }),
        Err(_) => Arc::new(DisabledClient),
    };
    if let Some(text) = request_insight(insight.as_ref(), &report.summary).await {
        println!("\n## Insight\n{text}");
    }

    for w in &report.warnings {
        tracing::debug!(warning = %w, "degraded");
    }
    println!(
        "\n{} warning(s); full report JSON below.\n{}",
        report.warnings.len(),
        serde_json::to_string_pretty(&report).context("serializing report")?
    );

    if let Some(m) = metrics {
        println!("\n{}", m.render());
    }
    Ok(())
}

//! Insight adapter: formats the six summary numbers for a narrative-generation
//! collaborator and passes its reply through untouched.
//! The crate ships no network provider; callers inject one behind `InsightClient`.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Serialize;

use crate::aggregate::SourceMetrics;

/// The numbers a narrative collaborator receives: avg/positive/negative per platform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryInputs {
    pub brand: String,
    pub avg_news: f64,
    pub pos_news: usize,
    pub neg_news: usize,
    pub avg_social: f64,
    pub pos_social: usize,
    pub neg_social: usize,
}

impl SummaryInputs {
    pub fn from_metrics(brand: &str, news: &SourceMetrics, social: &SourceMetrics) -> Self {
        Self {
            brand: brand.to_string(),
            avg_news: news.average_score,
            pos_news: news.positive_count,
            neg_news: news.negative_count,
            avg_social: social.average_score,
            pos_social: social.positive_count,
            neg_social: social.negative_count,
        }
    }

    /// Prompt text; averages are printed with two decimals.
    pub fn prompt(&self) -> String {
        format!(
            "Brand: {brand}\n\
             \n\
             NEWS:\n\
             Avg Sentiment: {avg_news:.2}\n\
             Positive: {pos_news}, Negative: {neg_news}\n\
             \n\
             SOCIAL:\n\
             Avg Sentiment: {avg_social:.2}\n\
             Positive: {pos_social}, Negative: {neg_social}\n\
             \n\
             Provide a clear, concise insight & recommendations.",
            brand = self.brand,
            avg_news = self.avg_news,
            pos_news = self.pos_news,
            neg_news = self.neg_news,
            avg_social = self.avg_social,
            pos_social = self.pos_social,
            neg_social = self.neg_social,
        )
    }
}

/// Narrative-generation collaborator. `None` means "no insight available".
pub trait InsightClient: Send + Sync {
    fn summarize<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>>;
    /// Provider name for diagnostics.
    fn provider_name(&self) -> &'static str;
}

pub type DynInsightClient = Arc<dyn InsightClient>;

/// Returns `None` always; used when no narrative service is wired.
pub struct DisabledClient;

impl InsightClient for DisabledClient {
    fn summarize<'a>(
        &'a self,
        _prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>> {
        Box::pin(async { None })
    }
    fn provider_name(&self) -> &'static str {
        "disabled"
    }
}

/// Fixed reply for tests and local runs.
#[derive(Clone)]
pub struct MockClient {
    pub fixed: String,
}

impl InsightClient for MockClient {
    fn summarize<'a>(
        &'a self,
        _prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Option<String>> + Send + 'a>> {
        let out = self.fixed.clone();
        Box::pin(async move { Some(out) })
    }
    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Ask `client` for a narrative. The reply is not parsed or validated.
pub async fn request_insight(client: &dyn InsightClient, inputs: &SummaryInputs) -> Option<String> {
    let prompt = inputs.prompt();
    let out = client.summarize(&prompt).await;
    if out.is_none() {
        tracing::info!(provider = client.provider_name(), "no narrative insight returned");
    }
    out
}

// src/ingest/providers/newsapi.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::histogram;
use serde::Deserialize;

use crate::ingest::types::{FetchRequest, Platform, RawFields, SourceProvider};

#[derive(Debug, Deserialize)]
struct Everything {
    // An error payload has no `articles`; treat it as an empty result.
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Article {
    title: Option<String>,
    description: Option<String>,
    published_at: Option<String>,
    url: Option<String>,
    source: Option<ArticleSource>,
}

#[derive(Debug, Deserialize)]
struct ArticleSource {
    name: Option<String>,
}

/// News provider backed by a captured `/v2/everything` JSON response.
/// No HTTP; the response body is supplied up front.
pub struct NewsApiProvider {
    pub body: String,
}

impl NewsApiProvider {
    pub fn from_fixture(content: &str) -> Self {
        Self {
            body: content.to_string(),
        }
    }
}

fn to_fields(a: Article) -> RawFields {
    let mut f = RawFields::with_capacity(5);
    f.insert("title".into(), a.title);
    f.insert("description".into(), a.description);
    f.insert("publishedAt".into(), a.published_at);
    f.insert("url".into(), a.url);
    f.insert("source".into(), a.source.and_then(|s| s.name));
    f
}

#[async_trait]
impl SourceProvider for NewsApiProvider {
    async fn fetch(&self, req: &FetchRequest) -> Result<Vec<RawFields>> {
        let t0 = std::time::Instant::now();

        let resp: Everything =
            serde_json::from_str(&self.body).context("parsing newsapi response json")?;
        let out: Vec<RawFields> = resp
            .articles
            .into_iter()
            .take(req.max_records)
            .map(to_fields)
            .collect();

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("ingest_parse_ms").record(ms);

        Ok(out)
    }

    fn name(&self) -> &'static str {
        "NewsAPI"
    }

    fn platform(&self) -> Platform {
        Platform::News
    }
}

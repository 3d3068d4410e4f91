// src/ingest/config.rs
use anyhow::{bail, Context, Result};
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::ingest::types::FetchRequest;

pub const ENV_PATH: &str = "BRAND_PULSE_CONFIG_PATH";

const NEWS_RANGE: (usize, usize) = (10, 100);
const SOCIAL_RANGE: (usize, usize) = (10, 50);

/// Request parameters for one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub brand: String,
    /// Defaults to seven days before `end_date`.
    pub start_date: Option<NaiveDate>,
    /// Defaults to today (UTC).
    pub end_date: Option<NaiveDate>,
    pub max_news: usize,
    pub max_social: usize,
    pub top_k: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            brand: "Nike".to_string(),
            start_date: None,
            end_date: None,
            max_news: 50,
            max_social: 20,
            top_k: crate::rank::DEFAULT_TOP_K,
        }
    }
}

impl PipelineConfig {
    /// Clamp counts into their allowed ranges and fix a reversed date range.
    pub fn sanitized(mut self) -> Self {
        self.brand = self.brand.trim().to_string();
        if self.brand.is_empty() {
            self.brand = Self::default().brand;
        }
        self.max_news = self.max_news.clamp(NEWS_RANGE.0, NEWS_RANGE.1);
        self.max_social = self.max_social.clamp(SOCIAL_RANGE.0, SOCIAL_RANGE.1);
        self.top_k = self.top_k.max(1);
        if let (Some(s), Some(e)) = (self.start_date, self.end_date) {
            if s > e {
                std::mem::swap(&mut self.start_date, &mut self.end_date);
            }
        }
        self
    }

    /// Resolve the date window, filling gaps relative to `today`.
    pub fn date_range(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let end = self.end_date.unwrap_or(today);
        let start = self.start_date.unwrap_or(end - Duration::days(7));
        (start, end)
    }

    pub fn news_request(&self) -> FetchRequest {
        self.request(self.max_news)
    }

    pub fn social_request(&self) -> FetchRequest {
        self.request(self.max_social)
    }

    fn request(&self, max_records: usize) -> FetchRequest {
        let (start_date, end_date) = self.date_range(Utc::now().date_naive());
        FetchRequest {
            brand: self.brand.clone(),
            start_date,
            end_date,
            max_records,
        }
    }
}

/// Load config from an explicit path. Supports TOML or JSON formats.
pub fn load_config_from(path: &Path) -> Result<PipelineConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading pipeline config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_config(&content, ext.as_str()).map(PipelineConfig::sanitized)
}

const FALLBACK_PATHS: [&str; 2] = ["config/pipeline.toml", "config/pipeline.json"];

/// Where the config comes from: `$BRAND_PULSE_CONFIG_PATH` if set (it must
/// exist), else the first fallback file present, else nothing.
fn config_source() -> Result<Option<PathBuf>> {
    match std::env::var_os(ENV_PATH).filter(|v| !v.is_empty()) {
        Some(v) => {
            let path = PathBuf::from(v);
            if !path.exists() {
                bail!("{ENV_PATH}={} does not exist", path.display());
            }
            Ok(Some(path))
        }
        None => Ok(FALLBACK_PATHS.into_iter().map(PathBuf::from).find(|p| p.exists())),
    }
}

/// Load the run config from the env path, `config/pipeline.{toml,json}`, or
/// the built-in defaults. Every branch is sanitized.
pub fn load_config_default() -> Result<PipelineConfig> {
    match config_source()? {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading pipeline config");
            load_config_from(&path)
        }
        None => {
            tracing::debug!("no pipeline config file, using defaults");
            Ok(PipelineConfig::default().sanitized())
        }
    }
}

fn parse_config(s: &str, hint_ext: &str) -> Result<PipelineConfig> {
    let looks_like_json = s.trim_start().starts_with('{');
    if hint_ext == "json" || (hint_ext != "toml" && looks_like_json) {
        return serde_json::from_str(s).context("parsing pipeline config json");
    }
    toml::from_str(s).context("parsing pipeline config toml")
}

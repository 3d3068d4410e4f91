//! # Outcome
//! Explicit "clean or degraded" results for the pipeline.
//!
//! Nothing in the core returns `Err`. A step that had to substitute a safe
//! default returns `Outcome::Degraded` with the value it used and the warnings
//! that explain why, so callers (and tests) can see the degraded path instead
//! of inferring it from the absence of a crash.

use serde::Serialize;
use thiserror::Error;

use crate::ingest::types::Platform;

/// Which raw field was absent when a record was normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Title,
    Description,
    PublishedAt,
    Url,
    Source,
}

impl Field {
    /// Raw key used by the fetch collaborators.
    pub fn key(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Description => "description",
            Field::PublishedAt => "publishedAt",
            Field::Url => "url",
            Field::Source => "source",
        }
    }
}

/// Non-fatal conditions raised while running the pipeline.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    #[error("missing field `{}`, substituted empty string", .field.key())]
    MissingField { field: Field },

    #[error("unparseable timestamp {raw:?}, record marked undated")]
    UnparseableDate { raw: String },

    #[error("no {platform} records, metrics reported as zero")]
    EmptySourceSet { platform: Platform },

    #[error("classification failed ({reason}), record scored Neutral 0.00")]
    ClassificationFailure { reason: String },
}

/// A value that is either computed normally or replaced by a safe default.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Clean(T),
    Degraded { value: T, warnings: Vec<Warning> },
}

impl<T> Outcome<T> {
    /// Wraps `value`, degrading only when `warnings` is non-empty.
    pub fn with_warnings(value: T, warnings: Vec<Warning>) -> Self {
        if warnings.is_empty() {
            Outcome::Clean(value)
        } else {
            Outcome::Degraded { value, warnings }
        }
    }

    pub fn degraded(value: T, warning: Warning) -> Self {
        Outcome::Degraded {
            value,
            warnings: vec![warning],
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Outcome::Degraded { .. })
    }

    pub fn value(&self) -> &T {
        match self {
            Outcome::Clean(v) => v,
            Outcome::Degraded { value, .. } => value,
        }
    }

    pub fn warnings(&self) -> &[Warning] {
        match self {
            Outcome::Clean(_) => &[],
            Outcome::Degraded { warnings, .. } => warnings,
        }
    }

    /// Splits into the value and its warnings (empty when clean).
    pub fn into_parts(self) -> (T, Vec<Warning>) {
        match self {
            Outcome::Clean(v) => (v, Vec::new()),
            Outcome::Degraded { value, warnings } => (value, warnings),
        }
    }

    /// Drops the warnings into `sink` and returns the value.
    pub fn drain_into(self, sink: &mut Vec<Warning>) -> T {
        let (value, mut warnings) = self.into_parts();
        sink.append(&mut warnings);
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_warning_list_stays_clean() {
        let o = Outcome::with_warnings(3, Vec::new());
        assert_eq!(o, Outcome::Clean(3));
        assert!(o.warnings().is_empty());
    }

    #[test]
    fn drain_collects_warnings() {
        let mut sink = Vec::new();
        let o = Outcome::degraded(
            "x",
            Warning::UnparseableDate {
                raw: "yesterday".into(),
            },
        );
        assert!(o.is_degraded());
        assert_eq!(o.drain_into(&mut sink), "x");
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn warning_messages_name_the_field() {
        let w = Warning::MissingField {
            field: Field::PublishedAt,
        };
        assert_eq!(
            w.to_string(),
            "missing field `publishedAt`, substituted empty string"
        );
    }

    #[test]
    fn empty_source_warning_carries_the_platform() {
        let w = Warning::EmptySourceSet {
            platform: Platform::Social,
        };
        assert_eq!(w.to_string(), "no Social records, metrics reported as zero");
        let json = serde_json::to_value(&w).unwrap();
        assert_eq!(json["kind"], "empty_source_set");
        assert_eq!(json["platform"], "social");
    }
}

//! # Sentiment
//! Polarity scoring and the fixed label thresholds.
//!
//! The classifier is a pure function of its input text: no state survives a
//! call, so identical text always yields identical `(label, score)`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

use crate::outcome::{Outcome, Warning};

/// Strictly above this → Positive.
pub const POSITIVE_THRESHOLD: f64 = 0.1;
/// Strictly below this → Negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.1;

static LEXICON: Lazy<Result<HashMap<String, f64>, String>> = Lazy::new(|| {
    let raw = include_str!("../sentiment_lexicon.json");
    serde_json::from_str::<HashMap<String, f64>>(raw).map_err(|e| e.to_string())
});

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    // Word characters plus inner apostrophes, so "isn't" stays one token.
    Regex::new(r"[\p{L}\p{N}]+(?:'[\p{L}]+)*").expect("static token regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Glyph used on summary lines.
    pub fn icon(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "✅",
            SentimentLabel::Negative => "⚠️",
            SentimentLabel::Neutral => "➖",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Neutral => "Neutral",
        };
        f.pad(s)
    }
}

/// Threshold policy. Both boundaries (0.1 and -0.1) are Neutral.
pub fn label_for(score: f64) -> SentimentLabel {
    if score > POSITIVE_THRESHOLD {
        SentimentLabel::Positive
    } else if score < NEGATIVE_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub label: SentimentLabel,
    pub score: f64,
}

impl Sentiment {
    pub const NEUTRAL: Sentiment = Sentiment {
        label: SentimentLabel::Neutral,
        score: 0.0,
    };

    /// Clamp into [-1, 1] and derive the label.
    /// Non-finite scores collapse to 0.0, and -0.0 folds to 0.0.
    pub fn from_score(score: f64) -> Self {
        let score = if score.is_finite() {
            score.clamp(-1.0, 1.0) + 0.0
        } else {
            0.0
        };
        Self {
            label: label_for(score),
            score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("lexicon unavailable: {0}")]
    Lexicon(String),
    #[error("{0}")]
    Engine(String),
}

/// Any engine that maps text to a polarity in [-1, 1].
pub trait PolarityModel: Send + Sync {
    fn polarity(&self, text: &str) -> Result<f64, ModelError>;
    fn name(&self) -> &'static str;
}

/// Averaging lexicon model with negation and intensifiers.
#[derive(Debug, Clone, Default)]
pub struct LexiconModel;

impl LexiconModel {
    pub fn new() -> Self {
        Self
    }
}

impl PolarityModel for LexiconModel {
    /// Each lexicon hit contributes its polarity, scaled by an intensifier right
    /// before it and flipped at half strength when a negator sits within the
    /// previous three tokens. The result is the mean of all contributions.
    fn polarity(&self, text: &str) -> Result<f64, ModelError> {
        let lexicon = LEXICON
            .as_ref()
            .map_err(|e| ModelError::Lexicon(e.clone()))?;

        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = TOKEN_RE.find_iter(&lowered).map(|m| m.as_str()).collect();

        let mut sum = 0.0;
        let mut hits = 0usize;
        for (i, tok) in tokens.iter().enumerate() {
            let Some(&base) = lexicon.get(*tok) else {
                continue;
            };
            let mut v = base;
            if let Some(m) = i.checked_sub(1).and_then(|j| intensity(tokens[j])) {
                v *= m;
            }
            let negated = (1..=3).any(|k| i >= k && is_negator(tokens[i - k]));
            if negated {
                v *= -0.5;
            }
            sum += v;
            hits += 1;
        }

        if hits == 0 {
            return Ok(0.0);
        }
        Ok((sum / hits as f64).clamp(-1.0, 1.0))
    }

    fn name(&self) -> &'static str {
        "lexicon"
    }
}

fn is_negator(tok: &str) -> bool {
    matches!(
        tok,
        "not"
            | "no"
            | "never"
            | "isn't"
            | "wasn't"
            | "aren't"
            | "won't"
            | "can't"
            | "cannot"
            | "don't"
            | "doesn't"
            | "didn't"
            | "without"
    )
}

fn intensity(tok: &str) -> Option<f64> {
    let m = match tok {
        "very" | "really" | "super" | "highly" | "totally" => 1.3,
        "extremely" | "incredibly" => 1.5,
        "absolutely" => 1.4,
        "so" => 1.2,
        "quite" => 1.1,
        "somewhat" => 0.7,
        "slightly" => 0.6,
        "barely" => 0.5,
        _ => return None,
    };
    Some(m)
}

/// Applies the threshold policy on top of a polarity model.
#[derive(Debug, Clone, Default)]
pub struct SentimentClassifier<M: PolarityModel = LexiconModel> {
    model: M,
}

impl SentimentClassifier<LexiconModel> {
    pub fn new() -> Self {
        Self {
            model: LexiconModel::new(),
        }
    }
}

impl<M: PolarityModel> SentimentClassifier<M> {
    pub fn with_model(model: M) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &'static str {
        self.model.name()
    }

    /// Empty text is Neutral/0.0. A model error or non-finite score degrades to
    /// Neutral/0.0 with a `ClassificationFailure` warning.
    pub fn classify(&self, text: &str) -> Outcome<Sentiment> {
        if text.trim().is_empty() {
            return Outcome::Clean(Sentiment::NEUTRAL);
        }
        match self.model.polarity(text) {
            Ok(score) if score.is_finite() => Outcome::Clean(Sentiment::from_score(score)),
            Ok(score) => Outcome::degraded(
                Sentiment::NEUTRAL,
                Warning::ClassificationFailure {
                    reason: format!("{} returned non-finite polarity {score}", self.model.name()),
                },
            ),
            Err(e) => Outcome::degraded(
                Sentiment::NEUTRAL,
                Warning::ClassificationFailure {
                    reason: e.to_string(),
                },
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;
    impl PolarityModel for Broken {
        fn polarity(&self, _text: &str) -> Result<f64, ModelError> {
            Err(ModelError::Engine("tokenizer exploded".into()))
        }
        fn name(&self) -> &'static str {
            "broken"
        }
    }

    struct Nan;
    impl PolarityModel for Nan {
        fn polarity(&self, _text: &str) -> Result<f64, ModelError> {
            Ok(f64::NAN)
        }
        fn name(&self) -> &'static str {
            "nan"
        }
    }

    fn score(text: &str) -> f64 {
        SentimentClassifier::new().classify(text).value().score
    }

    #[test]
    fn thresholds_are_strict() {
        assert_eq!(label_for(0.1), SentimentLabel::Neutral);
        assert_eq!(label_for(-0.1), SentimentLabel::Neutral);
        assert_eq!(label_for(0.1000001), SentimentLabel::Positive);
        assert_eq!(label_for(-0.1000001), SentimentLabel::Negative);
        assert_eq!(label_for(0.0), SentimentLabel::Neutral);
    }

    #[test]
    fn empty_text_is_clean_neutral() {
        let c = SentimentClassifier::new();
        assert_eq!(c.classify(""), Outcome::Clean(Sentiment::NEUTRAL));
        // title + " " + description with both empty
        assert_eq!(c.classify(" "), Outcome::Clean(Sentiment::NEUTRAL));
    }

    #[test]
    fn lexicon_hits_are_averaged() {
        assert!((score("Great shoes") - 0.8).abs() < 1e-9);
        assert!(score("good and bad").abs() < 1e-9);
        assert_eq!(score("The store opens on Monday"), 0.0);
    }

    #[test]
    fn negation_flips_at_half_strength() {
        assert!((score("this is not good") - (-0.35)).abs() < 1e-9);
        assert!((score("it isn't great at all") - (-0.4)).abs() < 1e-9);
    }

    #[test]
    fn intensifier_scales_and_result_is_clamped() {
        assert!((score("very good") - 0.91).abs() < 1e-9);
        assert_eq!(score("extremely excellent"), 1.0);
    }

    #[test]
    fn classification_is_deterministic() {
        let c = SentimentClassifier::new();
        let t = "Nike recall sparks backlash, but fans still love the new runners";
        assert_eq!(c.classify(t), c.classify(t));
    }

    #[test]
    fn model_failure_degrades_to_neutral() {
        let c = SentimentClassifier::with_model(Broken);
        let out = c.classify("anything");
        assert_eq!(out.value(), &Sentiment::NEUTRAL);
        assert!(matches!(
            out.warnings(),
            [Warning::ClassificationFailure { reason }] if reason == "tokenizer exploded"
        ));

        let out = SentimentClassifier::with_model(Nan).classify("anything");
        assert!(out.is_degraded());
        assert_eq!(out.value().score, 0.0);
    }
}

//! GreenLane: local sustainability analysis for product listings
//!
//! This library scores a product's sustainability from its listing text and
//! returns a structured analysis (score, positives, negatives, recommendation).
//! The scoring path is a deterministic keyword heuristic; model backends plug in
//! behind [`backend::InferenceBackend`].

pub mod analyzer;
pub mod backend;
pub mod config;
pub mod error;
pub mod reporter;
pub mod tokenizer;

pub use error::EngineError;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Product attributes supplied by the caller for one analysis
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductInput {
    /// Listing title (required, non-empty)
    pub title: String,
    /// Brand name
    pub brand: String,
    /// Price as displayed; never parsed
    pub price: String,
    /// Materials description
    pub materials: String,
}

impl ProductInput {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into();
        self
    }

    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = price.into();
        self
    }

    pub fn with_materials(mut self, materials: impl Into<String>) -> Self {
        self.materials = materials.into();
        self
    }
}

/// The result of analyzing a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Sustainability estimate (0-100)
    pub green_score: u8,
    /// Sustainability strengths, never empty
    pub positives: Vec<String>,
    /// Sustainability concerns, never empty
    pub negatives: Vec<String>,
    /// One-sentence verdict derived from the final score
    pub recommendation: Recommendation,
}

/// Wire shape of a completed analysis, as returned by `POST /analyze`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    #[serde(flatten)]
    pub result: AnalysisResult,
    /// Always true: the analysis ran on this machine
    pub local_analysis: bool,
}

impl From<AnalysisResult> for AnalysisResponse {
    fn from(result: AnalysisResult) -> Self {
        Self {
            result,
            local_analysis: true,
        }
    }
}

/// Recommendation tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    /// Score 70 and above
    Positive,
    /// Score 40 to 69
    Neutral,
    /// Score below 40
    Negative,
}

impl Recommendation {
    pub fn from_score(score: u8) -> Self {
        match score {
            70..=u8::MAX => Recommendation::Positive,
            40..=69 => Recommendation::Neutral,
            _ => Recommendation::Negative,
        }
    }

    /// Canonical sentence for this tier
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Positive => {
                "Good eco-friendly choice. Consider the product's full lifecycle."
            }
            Recommendation::Neutral => "Average sustainability. Look for certified eco-alternatives.",
            Recommendation::Negative => {
                "Consider more sustainable alternatives for this product category."
            }
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Recommendation {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Snapshot of engine state for status reporting
#[derive(Debug, Clone, PartialEq)]
pub struct EngineStats {
    /// Identifier of the loaded model (or the mock analyzer)
    pub model_name: String,
    /// Whether a model (real or mock) is ready
    pub loaded: bool,
    /// Mean of the recent latency window in milliseconds (0 when empty)
    pub avg_latency_ms: f64,
    /// Number of latencies currently in the window
    pub latency_samples: usize,
    /// Successful analyses since startup
    pub total_analyses: u64,
    /// Completion time of the most recent analysis
    pub last_analysis_at: Option<DateTime<Utc>>,
}

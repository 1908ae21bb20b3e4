//! Analyzer module - sustainability analysis engine

pub mod engine;
pub mod prompt;
pub mod scoring;
pub mod window;

pub use engine::InferenceEngine;
pub use scoring::{matched_keywords, score_product, KeywordMatch};
pub use window::{LatencyWindow, LATENCY_WINDOW_CAPACITY};

//! Inference backends
//!
//! The engine talks to a backend through [`InferenceBackend`]. Two variants
//! exist: [`MockBackend`] (heuristic only) and [`RealModelBackend`] (validates
//! a model file and prepares prompts, then scores heuristically until a runtime
//! is linked in). The variant is chosen at startup from configuration.

pub mod mock;
pub mod model;

pub use mock::{MockBackend, MOCK_MODEL_NAME};
pub use model::RealModelBackend;

use crate::{AnalysisResult, EngineError, ProductInput};
use std::path::Path;

/// Path value that requests mock mode explicitly
pub const MOCK_SENTINEL: &str = "mock";

/// Which backend variant is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Mock,
    Model,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Mock => write!(f, "mock"),
            BackendKind::Model => write!(f, "model"),
        }
    }
}

/// A source of sustainability analyses
pub trait InferenceBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Prepare the backend from `path`; returns the model name on success
    fn load(&mut self, path: &str) -> Result<String, EngineError>;

    /// Approximate resident memory for this backend, in MB
    fn memory_mb(&self) -> u64;

    fn infer(&self, product: &ProductInput) -> AnalysisResult;
}

/// Whether `path` asks for mock mode rather than a model file
pub fn is_mock_sentinel(path: &str) -> bool {
    let trimmed = path.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case(MOCK_SENTINEL)
}

/// Pick the backend variant for an optional model path
pub fn select(model: Option<&Path>) -> Box<dyn InferenceBackend> {
    match model.and_then(|p| p.to_str()) {
        Some(path) if !is_mock_sentinel(path) => Box::new(RealModelBackend::new()),
        _ => Box::new(MockBackend::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_sentinel() {
        assert!(is_mock_sentinel(""));
        assert!(is_mock_sentinel("  "));
        assert!(is_mock_sentinel("mock"));
        assert!(is_mock_sentinel("MOCK"));
        assert!(!is_mock_sentinel("models/llama.pte"));
    }

    #[test]
    fn test_select_by_path() {
        assert_eq!(select(None).kind(), BackendKind::Mock);
        assert_eq!(select(Some(Path::new("mock"))).kind(), BackendKind::Mock);
        assert_eq!(
            select(Some(Path::new("models/llama3_2-1B.pte"))).kind(),
            BackendKind::Model
        );
    }
}

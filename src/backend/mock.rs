//! Heuristic-only backend

use super::{BackendKind, InferenceBackend};
use crate::analyzer::scoring::score_product;
use crate::{AnalysisResult, EngineError, ProductInput};

pub const MOCK_MODEL_NAME: &str = "mock-sustainability-analyzer";

const MOCK_MEMORY_MB: u64 = 50;

/// Backend that needs no model file
#[derive(Debug, Default, Clone)]
pub struct MockBackend;

impl MockBackend {
    pub fn new() -> Self {
        Self
    }
}

impl InferenceBackend for MockBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Mock
    }

    fn load(&mut self, _path: &str) -> Result<String, EngineError> {
        tracing::info!("running in mock mode, no model runtime linked");
        Ok(MOCK_MODEL_NAME.to_string())
    }

    fn memory_mb(&self) -> u64 {
        MOCK_MEMORY_MB
    }

    fn infer(&self, product: &ProductInput) -> AnalysisResult {
        score_product(product)
    }
}

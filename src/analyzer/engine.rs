//! Inference engine - owns the backend and the latency statistics

use crate::backend::{self, BackendKind, InferenceBackend, MockBackend, MOCK_MODEL_NAME};
use crate::{AnalysisResult, EngineError, EngineStats, ProductInput};
use chrono::{DateTime, Utc};
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

use super::LatencyWindow;

/// Model name reported before any load attempt
pub const UNLOADED_MODEL_NAME: &str = "mock-llm";

/// Mutable engine state, guarded by a single mutex
#[derive(Debug)]
struct EngineState {
    loaded: bool,
    model_name: String,
    latencies: LatencyWindow,
    total_analyses: u64,
    last_analysis_at: Option<DateTime<Utc>>,
}

/// Runs analyses through the selected backend and tracks latency.
///
/// Safe to share across request handlers behind an `Arc`.
pub struct InferenceEngine {
    backend: RwLock<Box<dyn InferenceBackend>>,
    state: Mutex<EngineState>,
    /// Swap in the mock backend when a model fails to load
    fallback_to_mock: bool,
}

impl InferenceEngine {
    /// Create an engine around `backend`; nothing is loaded yet
    pub fn new(backend: Box<dyn InferenceBackend>) -> Self {
        Self {
            backend: RwLock::new(backend),
            state: Mutex::new(EngineState {
                loaded: false,
                model_name: UNLOADED_MODEL_NAME.to_string(),
                latencies: LatencyWindow::new(),
                total_analyses: 0,
                last_analysis_at: None,
            }),
            fallback_to_mock: true,
        }
    }

    /// Engine backed by the heuristic-only backend
    pub fn mock() -> Self {
        Self::new(Box::new(MockBackend::new()))
    }

    /// Control whether a failed model load degrades to mock mode
    pub fn with_fallback_to_mock(mut self, enabled: bool) -> Self {
        self.fallback_to_mock = enabled;
        self
    }

    /// Load a model from `path`. An empty path or `"mock"` selects mock mode.
    ///
    /// A load failure is returned to the caller. With fallback enabled the engine
    /// is nonetheless ready afterwards, serving from the mock backend.
    pub fn load_model(&self, path: &str) -> Result<(), EngineError> {
        tracing::info!(path, "loading model");
        let mut backend = self.write_backend();

        if backend::is_mock_sentinel(path) && backend.kind() != BackendKind::Mock {
            *backend = Box::new(MockBackend::new());
        }

        match backend.load(path) {
            Ok(name) => {
                tracing::info!(model = %name, backend = %backend.kind(), "model ready");
                self.mark_loaded(name);
                Ok(())
            }
            Err(err) => {
                if self.fallback_to_mock && backend.kind() != BackendKind::Mock {
                    tracing::warn!(error = %err, "failed to load model, running in mock mode");
                    *backend = Box::new(MockBackend::new());
                    self.mark_loaded(MOCK_MODEL_NAME.to_string());
                } else {
                    tracing::warn!(error = %err, "failed to load model");
                }
                Err(err)
            }
        }
    }

    /// Analyze one product, recording how long the backend took
    pub fn analyze(&self, product: &ProductInput) -> Result<AnalysisResult, EngineError> {
        if !self.is_loaded() {
            tracing::error!("analysis requested before a model was loaded");
            return Err(EngineError::NotReady);
        }

        tracing::debug!(title = %product.title, "analyzing product");
        let started = Instant::now();
        let result = self.read_backend().infer(product);
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

        {
            let mut state = self.lock_state();
            state.latencies.record(elapsed_ms);
            state.total_analyses += 1;
            state.last_analysis_at = Some(Utc::now());
        }

        tracing::info!(
            score = result.green_score,
            elapsed_ms,
            "analysis complete"
        );
        Ok(result)
    }

    /// Consistent snapshot of model and latency statistics
    pub fn stats(&self) -> EngineStats {
        let state = self.lock_state();
        EngineStats {
            model_name: state.model_name.clone(),
            loaded: state.loaded,
            avg_latency_ms: state.latencies.average_ms(),
            latency_samples: state.latencies.len(),
            total_analyses: state.total_analyses,
            last_analysis_at: state.last_analysis_at,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.lock_state().loaded
    }

    pub fn model_name(&self) -> String {
        self.lock_state().model_name.clone()
    }

    /// Static memory estimate of the active backend
    pub fn memory_mb(&self) -> u64 {
        self.read_backend().memory_mb()
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.read_backend().kind()
    }

    fn mark_loaded(&self, model_name: String) {
        let mut state = self.lock_state();
        state.loaded = true;
        state.model_name = model_name;
    }

    // A panic while holding a lock leaves plain data behind, so poisoning is ignored
    fn lock_state(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_backend(&self) -> RwLockReadGuard<'_, Box<dyn InferenceBackend>> {
        self.backend.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_backend(&self) -> RwLockWriteGuard<'_, Box<dyn InferenceBackend>> {
        self.backend.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InferenceEngine {
    fn default() -> Self {
        Self::mock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::LATENCY_WINDOW_CAPACITY;
    use crate::backend::RealModelBackend;
    use std::io::Write;
    use std::sync::Arc;
    use tempfile::NamedTempFile;

    #[test]
    fn test_analyze_before_load_is_not_ready() {
        let engine = InferenceEngine::mock();
        let err = engine.analyze(&ProductInput::new("Bamboo Brush")).unwrap_err();
        assert!(matches!(err, EngineError::NotReady));
        assert_eq!(engine.stats().total_analyses, 0);
    }

    #[test]
    fn test_mock_load() {
        let engine = InferenceEngine::mock();
        assert_eq!(engine.model_name(), UNLOADED_MODEL_NAME);
        engine.load_model("mock").unwrap();
        assert!(engine.is_loaded());
        assert_eq!(engine.model_name(), MOCK_MODEL_NAME);
        assert_eq!(engine.memory_mb(), 50);
    }

    #[test]
    fn test_analyze_records_latency() {
        let engine = InferenceEngine::mock();
        engine.load_model("").unwrap();
        let result = engine
            .analyze(&ProductInput::new("Bamboo Recycled Water Bottle"))
            .unwrap();
        assert_eq!(result.green_score, 80);

        let stats = engine.stats();
        assert_eq!(stats.total_analyses, 1);
        assert_eq!(stats.latency_samples, 1);
        assert!(stats.avg_latency_ms >= 0.0);
        assert!(stats.last_analysis_at.is_some());
    }

    #[test]
    fn test_latency_window_bounded_after_many_calls() {
        let engine = InferenceEngine::mock();
        engine.load_model("mock").unwrap();
        let product = ProductInput::new("Organic Cotton Tote");
        for _ in 0..=LATENCY_WINDOW_CAPACITY {
            engine.analyze(&product).unwrap();
        }
        let stats = engine.stats();
        assert_eq!(stats.total_analyses, LATENCY_WINDOW_CAPACITY as u64 + 1);
        assert_eq!(stats.latency_samples, LATENCY_WINDOW_CAPACITY);
    }

    #[test]
    fn test_identical_titles_identical_results() {
        let engine = InferenceEngine::mock();
        engine.load_model("mock").unwrap();
        let a = engine.analyze(&ProductInput::new("Reusable Vinyl Bag")).unwrap();
        let b = engine.analyze(&ProductInput::new("REUSABLE VINYL BAG")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_failed_load_falls_back_to_mock() {
        let engine = InferenceEngine::new(Box::new(RealModelBackend::new()));
        let err = engine.load_model("/nonexistent/llama.pte").unwrap_err();
        assert!(matches!(err, EngineError::Io { .. }));

        assert!(engine.is_loaded());
        assert_eq!(engine.backend_kind(), BackendKind::Mock);
        assert_eq!(engine.model_name(), MOCK_MODEL_NAME);
        assert!(engine.analyze(&ProductInput::new("Mug")).is_ok());
    }

    #[test]
    fn test_failed_load_without_fallback_stays_unloaded() {
        let engine =
            InferenceEngine::new(Box::new(RealModelBackend::new())).with_fallback_to_mock(false);
        assert!(engine.load_model("/nonexistent/llama.pte").is_err());
        assert!(!engine.is_loaded());
        assert!(matches!(
            engine.analyze(&ProductInput::new("Mug")),
            Err(EngineError::NotReady)
        ));
    }

    #[test]
    fn test_real_model_load() {
        let mut file = NamedTempFile::with_suffix(".pte").unwrap();
        file.write_all(b"model-bytes").unwrap();
        file.flush().unwrap();

        let engine = InferenceEngine::new(Box::new(RealModelBackend::new()));
        engine.load_model(file.path().to_str().unwrap()).unwrap();
        assert!(engine.is_loaded());
        assert_eq!(engine.backend_kind(), BackendKind::Model);
        assert_eq!(engine.memory_mb(), 1200);
        let result = engine.analyze(&ProductInput::new("Disposable Plastic Fork")).unwrap();
        assert_eq!(result.green_score, 23);
    }

    #[test]
    fn test_mock_sentinel_replaces_model_backend() {
        let engine = InferenceEngine::new(Box::new(RealModelBackend::new()));
        engine.load_model("mock").unwrap();
        assert_eq!(engine.backend_kind(), BackendKind::Mock);
    }

    #[test]
    fn test_concurrent_analyses() {
        let engine = Arc::new(InferenceEngine::mock());
        engine.load_model("mock").unwrap();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        let product = ProductInput::new(format!("Recycled Bottle {}", i));
                        assert_eq!(engine.analyze(&product).unwrap().green_score, 65);
                        let _ = engine.stats();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stats = engine.stats();
        assert_eq!(stats.total_analyses, 400);
        assert_eq!(stats.latency_samples, LATENCY_WINDOW_CAPACITY);
    }
}

//! Engine error types

use std::path::PathBuf;

/// Errors raised by the inference engine and its backends
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// `analyze` was called before any model was loaded
    #[error("model not loaded")]
    NotReady,

    /// The model file could not be opened or is not usable
    #[error("failed to load model from {}: {reason}", path.display())]
    ModelLoad { path: PathBuf, reason: String },

    #[error("failed to read model file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EngineError {
    pub fn model_load(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        EngineError::ModelLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

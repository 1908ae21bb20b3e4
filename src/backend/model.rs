//! Model-file backend

use super::{BackendKind, InferenceBackend};
use crate::analyzer::prompt::build_prompt;
use crate::analyzer::scoring::score_product;
use crate::tokenizer::{MockTokenizer, Tokenizer};
use crate::{AnalysisResult, EngineError, ProductInput};
use std::fs::File;
use std::path::Path;

/// Resident memory of a 1B-parameter model
const MODEL_MEMORY_MB: u64 = 1200;

/// Prompt tokens kept; the rest of the context is left for generation
pub const MAX_PROMPT_TOKENS: usize = 90;

const DEFAULT_MODEL_NAME: &str = "local-model";

/// Backend bound to an on-disk model file.
///
/// Loading validates the file. Inference prepares and tokenizes the prompt, then
/// scores with the keyword heuristic because no model runtime is linked.
pub struct RealModelBackend {
    tokenizer: Box<dyn Tokenizer>,
    model_bytes: Option<u64>,
}

impl RealModelBackend {
    pub fn new() -> Self {
        Self {
            tokenizer: Box::new(MockTokenizer::new()),
            model_bytes: None,
        }
    }

    /// Size of the loaded model file
    pub fn model_bytes(&self) -> Option<u64> {
        self.model_bytes
    }

    /// Tokenize the prompt for `product`, truncated to the prompt context
    pub fn prompt_tokens(&self, product: &ProductInput) -> Vec<u32> {
        let mut tokens = self.tokenizer.encode(&build_prompt(product));
        tokens.truncate(MAX_PROMPT_TOKENS);
        tokens
    }
}

impl Default for RealModelBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InferenceBackend for RealModelBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Model
    }

    fn load(&mut self, path: &str) -> Result<String, EngineError> {
        let model_path = Path::new(path);
        let file = File::open(model_path).map_err(|source| EngineError::Io {
            path: model_path.to_path_buf(),
            source,
        })?;
        let metadata = file.metadata().map_err(|source| EngineError::Io {
            path: model_path.to_path_buf(),
            source,
        })?;
        if !metadata.is_file() {
            return Err(EngineError::model_load(model_path, "not a regular file"));
        }
        if metadata.len() == 0 {
            return Err(EngineError::model_load(model_path, "model file is empty"));
        }

        self.model_bytes = Some(metadata.len());
        let name = model_path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_MODEL_NAME)
            .to_string();
        tracing::info!(
            model = %name,
            bytes = metadata.len(),
            vocab_size = self.tokenizer.vocab_size(),
            "model file loaded"
        );
        Ok(name)
    }

    fn memory_mb(&self) -> u64 {
        MODEL_MEMORY_MB
    }

    fn infer(&self, product: &ProductInput) -> AnalysisResult {
        let tokens = self.prompt_tokens(product);
        tracing::debug!(prompt_tokens = tokens.len(), "prompt prepared");
        score_product(product)
    }
}

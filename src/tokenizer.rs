//! Tokenizer seam for model backends
//!
//! Only the mock tokenizer exists today. Token ids are derived from a SHA-256
//! digest of each whitespace-separated word so they are stable across processes.

use sha2::{Digest, Sha256};

/// Vocabulary size reported by the mock tokenizer
pub const MOCK_VOCAB_SIZE: usize = 32_000;

/// Text <-> token id conversion
pub trait Tokenizer: Send + Sync {
    fn encode(&self, text: &str) -> Vec<u32>;

    fn decode(&self, tokens: &[u32]) -> String;

    fn vocab_size(&self) -> usize;
}

/// Whitespace tokenizer with hash-derived ids
#[derive(Debug, Default, Clone)]
pub struct MockTokenizer;

impl MockTokenizer {
    pub fn new() -> Self {
        Self
    }

    fn token_id(word: &str) -> u32 {
        let digest = Sha256::digest(word.as_bytes());
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        (u64::from_be_bytes(prefix) % MOCK_VOCAB_SIZE as u64) as u32
    }
}

impl Tokenizer for MockTokenizer {
    fn encode(&self, text: &str) -> Vec<u32> {
        text.split_whitespace().map(Self::token_id).collect()
    }

    /// The mock vocabulary has no reverse table, so every id renders as `[id]`
    fn decode(&self, tokens: &[u32]) -> String {
        tokens
            .iter()
            .map(|t| format!("[{}]", t))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn vocab_size(&self) -> usize {
        MOCK_VOCAB_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_one_token_per_word() {
        let tok = MockTokenizer::new();
        let ids = tok.encode("  bamboo   water\tbottle\n");
        assert_eq!(ids.len(), 3);
        assert!(ids.iter().all(|&id| (id as usize) < MOCK_VOCAB_SIZE));
    }

    #[test]
    fn test_encode_is_deterministic() {
        let tok = MockTokenizer::new();
        assert_eq!(tok.encode("organic cotton"), tok.encode("organic cotton"));
        let ids = tok.encode("eco eco");
        assert_eq!(ids[0], ids[1]);
    }

    #[test]
    fn test_decode_renders_ids() {
        let tok = MockTokenizer::new();
        assert_eq!(tok.decode(&[1, 42]), "[1] [42]");
        assert_eq!(tok.decode(&[]), "");
    }

    #[test]
    fn test_empty_input() {
        let tok = MockTokenizer::new();
        assert!(tok.encode("").is_empty());
        assert_eq!(tok.vocab_size(), MOCK_VOCAB_SIZE);
    }
}

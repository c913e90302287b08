use thiserror::Error;

/// Failures raised by the indexing engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("Tokenizer Error: {0}")]
    Tokenizer(String),

    #[error("vectorizer weights are already computed, learning is closed")]
    AlreadyCompiled,

    #[error("document {index} out of range, {len} documents learned")]
    DocumentOutOfRange { index: usize, len: usize },

    #[error("vectorizer has no learned documents")]
    Empty,
}

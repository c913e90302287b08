//! Indexing engine for the corpus service: tokenization, normalization,
//! BM25 vectorization and cosine similarity.

pub mod bm25;
pub mod count;
pub mod engine;
pub mod error;
pub mod normalizer;
pub mod output;
pub mod similarity;
pub mod token;
pub mod tokenizer;

pub use bm25::{Bm25Config, Bm25Vectorizer, Norm};
pub use engine::{Bm25Engine, EngineOptions, IndexingEngine, Vectorizer};
pub use error::EngineError;
pub use output::{EngineOutput, OutputKind};
pub use token::{Token, Tokens};
pub use tokenizer::{Tokenizer, TokenizerKind};

//! Engine seam consumed by the corpus service.
//!
//! [`IndexingEngine`] tokenizes and hands out fresh [`Vectorizer`]s. The
//! service never looks inside a vectorizer; it only reads the documented
//! outputs and validates them.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::{
    bm25::{Bm25Config, Bm25Vectorizer},
    error::EngineError,
    normalizer::NormalizerPipeline,
    output::{EngineOutput, OutputKind},
    similarity,
    token::Tokens,
    tokenizer::{Tokenizer, TokenizerKind},
};

pub trait Vectorizer: Debug + Send + 'static {
    /// Adds one document. Fails once any output has been read.
    fn learn(&mut self, tokens: &[String]) -> Result<(), EngineError>;

    /// Vector of an arbitrary token list against the learned vocabulary.
    fn vector_of(&mut self, tokens: &[String]) -> Result<Vec<f64>, EngineError>;

    /// Vector of the `index`-th learned document.
    fn doc_vector(&mut self, index: usize) -> Result<Vec<f64>, EngineError>;

    fn out(&mut self, kind: OutputKind) -> Result<EngineOutput, EngineError>;
}

pub trait IndexingEngine: Debug + Send + Sync + 'static {
    type Vectorizer: Vectorizer;

    /// Ordered, normalized tokens of `text`.
    fn tokenize(&self, text: &str) -> Result<Tokens, EngineError>;

    fn new_vectorizer(&self, config: &Bm25Config) -> Self::Vectorizer;

    fn cosine(&self, a: &[f64], b: &[f64]) -> f64 {
        similarity::cosine(a, b)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineOptions {
    pub tokenizer: TokenizerKind,
    pub stopwords: bool,
}

/// Default engine: tokenizer, normalizer pipeline and BM25 vectorizers.
#[derive(Clone, Debug)]
pub struct Bm25Engine {
    tokenizer: Tokenizer,
    pipeline: NormalizerPipeline,
}

impl Bm25Engine {
    pub fn new(options: EngineOptions) -> Self {
        Self::with_parts(
            Tokenizer::from_kind(options.tokenizer),
            NormalizerPipeline::standard(options.stopwords),
        )
    }

    pub fn with_parts(tokenizer: Tokenizer, pipeline: NormalizerPipeline) -> Self {
        Self {
            tokenizer,
            pipeline,
        }
    }
}

impl Default for Bm25Engine {
    fn default() -> Self {
        Self::new(EngineOptions::default())
    }
}

impl IndexingEngine for Bm25Engine {
    type Vectorizer = Bm25Vectorizer;

    fn tokenize(&self, text: &str) -> Result<Tokens, EngineError> {
        // Tokenizers and normalizers are stateful, each call gets its own copy.
        let mut tokenizer = self.tokenizer.clone();
        let mut pipeline = self.pipeline.clone();

        let mut tokens = tokenizer.tokenize(text)?;

        if !pipeline.is_empty() {
            pipeline.run(&mut tokens);
        }

        tokens.retain_mut(|token| !token.is_empty());
        Ok(tokens)
    }

    fn new_vectorizer(&self, config: &Bm25Config) -> Self::Vectorizer {
        Bm25Vectorizer::new(*config)
    }
}

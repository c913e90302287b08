pub mod case;
pub mod punctuation;
pub mod stopwords;

pub use {case::Lowercase, punctuation::Punctuation, stopwords::Stopwords};

use crate::token::Tokens;

pub trait TextNormalizerClone {
    fn clone_box(&self) -> Box<dyn TextNormalizer>;
}

impl<T> TextNormalizerClone for T
where
    T: 'static + TextNormalizer + Clone,
{
    fn clone_box(&self) -> Box<dyn TextNormalizer> {
        Box::new(self.clone())
    }
}

/// Rewrites a token list in place.
pub trait TextNormalizer: TextNormalizerClone + std::fmt::Debug + Send + Sync {
    fn normalize(&mut self, tokens: &mut Tokens);
}

impl Clone for Box<dyn TextNormalizer> {
    fn clone(&self) -> Box<dyn TextNormalizer> {
        self.clone_box()
    }
}

/// Normalizers applied in insertion order.
#[derive(Clone, Debug, Default)]
pub struct NormalizerPipeline(Vec<Box<dyn TextNormalizer>>);

impl NormalizerPipeline {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Lowercasing followed by punctuation stripping, optionally dropping stopwords.
    pub fn standard(stopwords: bool) -> Self {
        let mut pipeline = Self::new();
        pipeline
            .insert(Box::new(Lowercase::new()))
            .insert(Box::new(Punctuation::new()));

        if stopwords {
            pipeline.insert(Box::new(Stopwords::english()));
        }

        pipeline
    }

    pub fn insert(&mut self, normalizer: Box<dyn TextNormalizer>) -> &mut Self {
        self.0.push(normalizer);
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn run(&mut self, tokens: &mut Tokens) {
        self.0.iter_mut().for_each(|normalizer| {
            normalizer.normalize(tokens);
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        normalizer::{Lowercase, NormalizerPipeline, Punctuation, Stopwords},
        tokens,
    };

    #[test]
    fn test_normalizer_pipeline() {
        let mut tokens = tokens!["The", "cat", "in", "the", "hat", "and", "bat"];

        let mut pipeline = NormalizerPipeline::new();
        pipeline
            .insert(Box::new(Lowercase::new()))
            .insert(Box::new(Stopwords::new(["the", "and", "in"])));

        pipeline.run(&mut tokens);

        assert_eq!(tokens, tokens!["cat", "hat", "bat"]);
    }

    #[test]
    fn test_normalizer_with_punctuation() {
        let mut tokens = tokens!["the", "cat.", "in", "the!", "hat", "and?", "bat,"];

        let mut pipeline = NormalizerPipeline::new();
        pipeline
            .insert(Box::new(Punctuation::new()))
            .insert(Box::new(Stopwords::new(["the", "and", "in"])));

        pipeline.run(&mut tokens);

        assert_eq!(tokens, tokens!["cat", "hat", "bat"]);
    }

    #[test]
    fn test_standard_pipeline() {
        let mut tokens = tokens!["Cats", "PURR", "at", "Night!"];

        NormalizerPipeline::standard(false).run(&mut tokens);
        assert_eq!(tokens, tokens!["cats", "purr", "at", "night"]);

        let mut tokens = tokens!["Cats", "PURR", "at", "Night!"];
        NormalizerPipeline::standard(true).run(&mut tokens);
        assert_eq!(tokens, tokens!["cats", "purr", "night"]);
    }
}

use hashbrown::HashSet;

use crate::{normalizer::TextNormalizer, token::Tokens};

const ENGLISH: [&str; 33] = [
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

/// Drops tokens found in the set. Expects already lowercased tokens.
#[derive(Clone, Debug)]
pub struct Stopwords(HashSet<&'static str>);

impl Stopwords {
    pub fn new<const N: usize>(words: [&'static str; N]) -> Self {
        Self(words.into_iter().collect())
    }

    pub fn english() -> Self {
        Self::new(ENGLISH)
    }

    #[inline]
    pub fn contains(&self, word: &str) -> bool {
        self.0.contains(word)
    }
}

impl TextNormalizer for Stopwords {
    fn normalize(&mut self, tokens: &mut Tokens) {
        tokens.retain_mut(|token| !self.0.contains(token.as_str()))
    }
}

use crate::{normalizer::TextNormalizer, token::Tokens};

/// Unicode-aware lowercasing.
#[derive(Clone, Debug, Default)]
pub struct Lowercase;

impl Lowercase {
    pub fn new() -> Self {
        Self
    }
}

impl TextNormalizer for Lowercase {
    fn normalize(&mut self, tokens: &mut Tokens) {
        tokens.iter_mut().for_each(|token| {
            if token.chars().any(char::is_uppercase) {
                let lowered = token.to_lowercase();
                *token.inner_mut() = lowered;
            }
        })
    }
}

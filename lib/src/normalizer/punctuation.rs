use crate::{normalizer::TextNormalizer, token::Tokens};

/// Strips ASCII punctuation from every token. Tokens may end up empty.
#[derive(Clone, Debug, Default)]
pub struct Punctuation;

impl Punctuation {
    pub fn new() -> Self {
        Self
    }
}

impl TextNormalizer for Punctuation {
    fn normalize(&mut self, tokens: &mut Tokens) {
        tokens.iter_mut().for_each(|token| {
            token.inner_mut().retain(|ch| !ch.is_ascii_punctuation());
        });
    }
}

#[cfg(test)]
mod tests {
    use super::Punctuation;
    use crate::{normalizer::TextNormalizer, tokens};

    #[test]
    fn test_normalizer_punctuation() {
        let mut tokens = tokens!["don't", "stop!", "--"];
        Punctuation::new().normalize(&mut tokens);
        assert_eq!(tokens, tokens!["dont", "stop", ""]);
    }
}

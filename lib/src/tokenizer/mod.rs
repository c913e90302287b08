mod html;
mod standard;
mod whitespace;

pub use {html::Html, standard::Standard, whitespace::Whitespace};

use serde::{Deserialize, Serialize};

use crate::{error::EngineError, token::Tokens};

/// Selects which tokenizer an engine is built with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenizerKind {
    #[default]
    Standard,
    Whitespace,
    Html,
}

#[derive(Clone, Debug)]
pub enum Tokenizer {
    Standard(Standard),
    Whitespace(Whitespace),
    Html(Html),
}

impl Tokenizer {
    pub fn from_kind(kind: TokenizerKind) -> Self {
        match kind {
            TokenizerKind::Standard => Tokenizer::Standard(Standard::new()),
            TokenizerKind::Whitespace => Tokenizer::Whitespace(Whitespace::new()),
            TokenizerKind::Html => Tokenizer::Html(Html::new()),
        }
    }

    pub fn tokenize(&mut self, text: &str) -> Result<Tokens, EngineError> {
        match self {
            Tokenizer::Standard(tokenizer) => tokenizer.tokenize(text),
            Tokenizer::Whitespace(tokenizer) => tokenizer.tokenize(text),
            Tokenizer::Html(tokenizer) => tokenizer.tokenize(text),
        }
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::from_kind(TokenizerKind::default())
    }
}

pub trait TextTokenizer {
    fn tokenize<T: AsRef<str>>(&mut self, text: T) -> Result<Tokens, EngineError>;
}

#[cfg(test)]
mod tests {
    use super::{Tokenizer, TokenizerKind};
    use crate::tokens;

    #[test]
    fn test_tokenizer_from_kind() {
        let mut tokenizer = Tokenizer::from_kind(TokenizerKind::Whitespace);
        let tokens = tokenizer.tokenize("cats, purr").unwrap();
        assert_eq!(tokens, tokens!["cats,", "purr"]);

        let mut tokenizer = Tokenizer::from_kind(TokenizerKind::Standard);
        let tokens = tokenizer.tokenize("cats, purr").unwrap();
        assert_eq!(tokens, tokens!["cats", "purr"]);
    }

    #[test]
    fn test_tokenizer_kind_serde() {
        let kind: TokenizerKind = serde_json::from_str("\"html\"").unwrap();
        assert_eq!(kind, TokenizerKind::Html);
    }
}

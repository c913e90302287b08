use crate::{
    error::EngineError,
    token::Token,
    tokenizer::{TextTokenizer, Tokens},
};

const DELIMITERS: &[char] = &[
    ',', ';', ':', '!', '?', '@', '#', '$', '%', '^', '&', '*', '.', '-', '/', '(', ')', '{', '}',
    '[', ']', '\'', '"', '<', '>', '|',
];

/// Splits on whitespace and common punctuation delimiters.
#[derive(Clone, Debug, Default)]
pub struct Standard;

impl Standard {
    pub fn new() -> Self {
        Self
    }

    #[inline]
    fn is_delimiter(ch: char) -> bool {
        ch.is_whitespace() || DELIMITERS.contains(&ch)
    }
}

impl TextTokenizer for Standard {
    fn tokenize<T: AsRef<str>>(&mut self, text: T) -> Result<Tokens, EngineError> {
        Ok(text
            .as_ref()
            .split(Self::is_delimiter)
            .filter(|s| !s.is_empty())
            .map(Token::from)
            .collect())
    }
}

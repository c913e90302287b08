use crate::{
    error::EngineError,
    token::Token,
    tokenizer::{TextTokenizer, Tokens},
};

#[derive(Clone, Debug, Default)]
pub struct Whitespace;

impl Whitespace {
    pub fn new() -> Self {
        Self
    }
}

impl TextTokenizer for Whitespace {
    fn tokenize<T: AsRef<str>>(&mut self, text: T) -> Result<Tokens, EngineError> {
        Ok(text.as_ref().split_whitespace().map(Token::from).collect())
    }
}

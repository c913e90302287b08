use crate::{
    error::EngineError,
    tokenizer::{Standard, TextTokenizer, Tokens},
};

/// Line width handed to the renderer; only affects wrapping, not tokens.
const RENDER_WIDTH: usize = 100;

/// Renders markup to plain text, then tokenizes it like [`Standard`].
#[derive(Clone, Debug, Default)]
pub struct Html {
    tokenizer: Standard,
}

impl Html {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TextTokenizer for Html {
    fn tokenize<T: AsRef<str>>(&mut self, text: T) -> Result<Tokens, EngineError> {
        let clean_text = html2text::config::plain()
            .string_from_read(text.as_ref().as_bytes(), RENDER_WIDTH)
            .map_err(|error| EngineError::Tokenizer(error.to_string()))?;

        self.tokenizer.tokenize(clean_text)
    }
}

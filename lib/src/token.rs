use std::{
    ops::{Deref, DerefMut},
    slice::{Iter, IterMut},
};

/// A single normalized (or about to be normalized) term.
#[derive(Clone, Debug, Default, Hash, Eq, PartialEq)]
pub struct Token(String);

impl Token {
    #[inline]
    pub fn inner(self) -> String {
        self.0
    }

    #[inline]
    pub fn inner_mut(&mut self) -> &mut String {
        &mut self.0
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for Token {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Token {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Token> for String {
    fn from(value: Token) -> Self {
        value.0
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Token(value)
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Token(String::from(value))
    }
}

impl From<&&str> for Token {
    fn from(value: &&str) -> Self {
        Token(String::from(*value))
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Ordered token list produced by a tokenizer and rewritten in place by normalizers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tokens(Vec<Token>);

impl Tokens {
    #[inline]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    #[inline]
    pub fn push(&mut self, token: Token) {
        self.0.push(token)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn iter(&self) -> Iter<'_, Token> {
        self.0.iter()
    }

    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, Token> {
        self.0.iter_mut()
    }

    #[inline]
    pub fn retain_mut<F>(&mut self, f: F)
    where
        F: FnMut(&mut Token) -> bool,
    {
        self.0.retain_mut(f)
    }

    /// Consumes the list, keeping token order.
    pub fn into_strings(self) -> Vec<String> {
        self.0.into_iter().map(Token::inner).collect()
    }
}

impl From<Vec<Token>> for Tokens {
    fn from(value: Vec<Token>) -> Self {
        Tokens(value)
    }
}

impl FromIterator<Token> for Tokens {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Tokens(iter.into_iter().collect())
    }
}

impl IntoIterator for Tokens {
    type Item = Token;
    type IntoIter = std::vec::IntoIter<Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[macro_export]
macro_rules! tokens {
    ( $( $token:expr ),* $(,)? ) => {{
        $crate::token::Tokens::from(vec![
            $( $crate::token::Token::from($token) ),*
        ])
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_tokens_into_strings_keeps_order() {
        let tokens = tokens!["b", "a", "b"];
        assert_eq!(tokens.into_strings(), vec!["b", "a", "b"]);
    }

    #[test]
    fn test_tokens_retain() {
        let mut tokens = tokens!["keep", "", "this"];
        tokens.retain_mut(|token| !token.is_empty());
        assert_eq!(tokens, tokens!["keep", "this"]);
        assert_eq!(tokens.len(), 2);
    }
}

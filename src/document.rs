use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// A document as handed to `LearnCorpus`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInput {
    #[serde(default)]
    pub id: Option<String>,

    pub text: String,

    /// Pre-computed tokens, used as is instead of tokenizing `text`.
    #[serde(default)]
    pub tokens: Option<Vec<String>>,
}

impl DocumentInput {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            text: text.into(),
            tokens: None,
        }
    }

    /// A document that gets a generated id when learned.
    pub fn anonymous(text: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
            tokens: None,
        }
    }

    pub fn with_tokens<S: Into<String>>(mut self, tokens: impl IntoIterator<Item = S>) -> Self {
        self.tokens = Some(tokens.into_iter().map(Into::into).collect());
        self
    }
}

/// A learned document. Immutable once it belongs to a corpus.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    id: String,
    text: String,
    tokens: Vec<String>,
}

impl Document {
    #[inline]
    pub(crate) fn new(id: String, text: String, tokens: Vec<String>) -> Self {
        Self { id, text, tokens }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Normalized tokens the document was learned with.
    #[inline]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

impl AsRef<str> for Document {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::DocumentInput;

    #[test]
    fn test_document_input_deserialize() {
        let input: DocumentInput = serde_json::from_str(r#"{"text":"cats purr"}"#).unwrap();
        assert_eq!(input, DocumentInput::anonymous("cats purr"));

        let input: DocumentInput =
            serde_json::from_str(r#"{"id":"a","text":"cats purr","tokens":["cats","purr"]}"#)
                .unwrap();
        assert_eq!(
            input,
            DocumentInput::new("a", "cats purr").with_tokens(["cats", "purr"])
        );
    }
}

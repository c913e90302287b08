#![allow(dead_code)]

use corpora::{Corpora, DocumentInput, Settings};
use corpus_engine::{
    Bm25Config, Bm25Engine, Bm25Vectorizer, EngineError, EngineOutput, IndexingEngine,
    OutputKind, Tokens, Vectorizer,
};

pub(crate) fn get_test_corpus() -> Vec<String> {
    vec![
        "The quick brown fox jumps over the lazy dog.",
        "The quick brown fox.",
        "The quick brown fox jumps.",
        "The quick brown fox jumps over.",
        "The quick brown fox jumps over the lazy dog again.",
        "The lazy dog lies in the sun.",
        "The dog is lazy.",
        "Foxes are quick and brown.",
        "Foxes jump over lazy dogs.",
        "A fast brown fox leaps over lazy hounds.",
        "Speedy brown foxes jump over sluggish dogs.",
        "Foxes are cunning and quick.",
        "Dogs are loyal and lazy.",
        "A fox is quicker than a dog.",
        "Jumping foxes and sleeping dogs.",
        "The sun shines on the lazy dog.",
        "Quick thinking foxes outsmart lazy dogs.",
        "The fox and the hound.",
        "A quick brown fox outpaces a lazy brown dog.",
        "Clever foxes evade the lazy dogs.",
    ]
    .iter()
    .map(|document| document.to_string())
    .collect::<Vec<_>>()
}

/// The fox corpus with ids `fox-0`, `fox-1`, ...
pub(crate) fn fox_documents() -> Vec<DocumentInput> {
    get_test_corpus()
        .into_iter()
        .enumerate()
        .map(|(index, text)| DocumentInput::new(format!("fox-{index}"), text))
        .collect()
}

pub(crate) fn pets() -> Vec<DocumentInput> {
    vec![
        DocumentInput::new("a", "cats purr"),
        DocumentInput::new("b", "dogs bark"),
    ]
}

pub(crate) fn service() -> Corpora<Bm25Engine> {
    Corpora::from_settings(Settings::default())
}

/// Bm25 engine whose tokenizer raises on any text containing `poison`.
#[derive(Debug, Default)]
pub(crate) struct PoisonedTokenizer(Bm25Engine);

impl IndexingEngine for PoisonedTokenizer {
    type Vectorizer = Bm25Vectorizer;

    fn tokenize(&self, text: &str) -> Result<Tokens, EngineError> {
        if text.contains("poison") {
            return Err(EngineError::Tokenizer(format!("refusing {text:?}")));
        }
        self.0.tokenize(text)
    }

    fn new_vectorizer(&self, config: &Bm25Config) -> Bm25Vectorizer {
        self.0.new_vectorizer(config)
    }
}

/// Ways [`Faulty`] corrupts what the real vectorizer returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Fault {
    /// Answers every `out` with the idf table.
    WrongTag,

    /// Drops the last weight of every document vector.
    ShortDocumentVector,

    /// Query vectors are all NaN.
    NonFiniteQuery,

    /// Term list repeats its first term.
    DuplicateTerms,

    /// Matrix is missing its last row.
    MissingRow,

    /// Every read raises.
    Raises,
}

#[derive(Debug)]
pub(crate) struct Faulty {
    fault: Fault,
    engine: Bm25Engine,
}

impl Faulty {
    pub(crate) fn new(fault: Fault) -> Self {
        Self {
            fault,
            engine: Bm25Engine::default(),
        }
    }
}

#[derive(Debug)]
pub(crate) struct FaultyVectorizer {
    fault: Fault,
    inner: Bm25Vectorizer,
}

impl Vectorizer for FaultyVectorizer {
    fn learn(&mut self, tokens: &[String]) -> Result<(), EngineError> {
        self.inner.learn(tokens)
    }

    fn vector_of(&mut self, tokens: &[String]) -> Result<Vec<f64>, EngineError> {
        match self.fault {
            Fault::Raises => Err(EngineError::Empty),
            Fault::NonFiniteQuery => Ok(self
                .inner
                .vector_of(tokens)?
                .into_iter()
                .map(|_| f64::NAN)
                .collect()),
            _ => self.inner.vector_of(tokens),
        }
    }

    fn doc_vector(&mut self, index: usize) -> Result<Vec<f64>, EngineError> {
        let mut vector = self.inner.doc_vector(index)?;
        if self.fault == Fault::ShortDocumentVector {
            vector.pop();
        }
        Ok(vector)
    }

    fn out(&mut self, kind: OutputKind) -> Result<EngineOutput, EngineError> {
        match (self.fault, kind) {
            (Fault::Raises, _) => Err(EngineError::Empty),
            (Fault::WrongTag, _) => self.inner.out(OutputKind::Idf),
            (Fault::DuplicateTerms, OutputKind::Terms) => match self.inner.out(kind)? {
                EngineOutput::Terms(mut terms) => {
                    if let Some(first) = terms.first().cloned() {
                        terms.push(first);
                    }
                    Ok(EngineOutput::Terms(terms))
                }
                other => Ok(other),
            },
            (Fault::MissingRow, OutputKind::DocTermMatrix) => match self.inner.out(kind)? {
                EngineOutput::DocTermMatrix(mut rows) => {
                    rows.pop();
                    Ok(EngineOutput::DocTermMatrix(rows))
                }
                other => Ok(other),
            },
            _ => self.inner.out(kind),
        }
    }
}

impl IndexingEngine for Faulty {
    type Vectorizer = FaultyVectorizer;

    fn tokenize(&self, text: &str) -> Result<Tokens, EngineError> {
        self.engine.tokenize(text)
    }

    fn new_vectorizer(&self, config: &Bm25Config) -> FaultyVectorizer {
        FaultyVectorizer {
            fault: self.fault,
            inner: self.engine.new_vectorizer(config),
        }
    }
}

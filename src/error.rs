use std::{
    fmt::{Display, Formatter},
    io,
    time::Duration,
};

use corpus_engine::EngineError;
use serde::Serialize;
use thiserror::Error;

/// What went wrong, independent of where.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// No live corpus under the given id.
    NotFound,

    /// `create` with an id that is already registered.
    AlreadyExists,

    /// The engine returned something that failed shape validation, or raised
    /// outside of tokenization.
    InvalidEngineOutput,

    TokenizationFailed,

    InvalidConfig,

    /// Gave up waiting for a corpus lock.
    LockTimeout,

    /// A tool request that could not be decoded or answered.
    InvalidRequest,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ErrorKind::NotFound => "corpus not found",
            ErrorKind::AlreadyExists => "corpus already exists",
            ErrorKind::InvalidEngineOutput => "invalid engine output",
            ErrorKind::TokenizationFailed => "tokenization failed",
            ErrorKind::InvalidConfig => "invalid bm25 config",
            ErrorKind::LockTimeout => "timed out waiting for corpus lock",
            ErrorKind::InvalidRequest => "invalid request",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Operation {
    CreateCorpus,
    LearnCorpus,
    QueryCorpus,
    CorpusStats,
    ListCorpora,
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Operation::CreateCorpus => "CreateCorpus",
            Operation::LearnCorpus => "LearnCorpus",
            Operation::QueryCorpus => "QueryCorpus",
            Operation::CorpusStats => "CorpusStats",
            Operation::ListCorpora => "ListCorpora",
        })
    }
}

/// Error returned by every corpus operation.
#[derive(Debug, Error)]
#[error("{operation} ({}): {kind}: {detail}", .corpus_id.as_deref().unwrap_or("-"))]
pub struct Error {
    kind: ErrorKind,
    corpus_id: Option<String>,
    operation: Operation,
    detail: String,
    #[source]
    source: Option<EngineError>,
}

impl Error {
    pub fn new(
        kind: ErrorKind,
        operation: Operation,
        corpus_id: Option<&str>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            corpus_id: corpus_id.map(str::to_owned),
            operation,
            detail: detail.into(),
            source: None,
        }
    }

    pub fn not_found(operation: Operation, corpus_id: &str) -> Self {
        Self::new(
            ErrorKind::NotFound,
            operation,
            Some(corpus_id),
            "no live session",
        )
    }

    pub fn already_exists(operation: Operation, corpus_id: &str) -> Self {
        Self::new(
            ErrorKind::AlreadyExists,
            operation,
            Some(corpus_id),
            "id is registered",
        )
    }

    pub fn invalid_output(
        operation: Operation,
        corpus_id: &str,
        detail: impl Into<String>,
    ) -> Self {
        Self::new(
            ErrorKind::InvalidEngineOutput,
            operation,
            Some(corpus_id),
            detail,
        )
    }

    /// The engine raised while doing `context`.
    pub fn engine(
        operation: Operation,
        corpus_id: &str,
        context: &str,
        source: EngineError,
    ) -> Self {
        let detail = format!("engine raised while {context}");
        Self {
            source: Some(source),
            ..Self::invalid_output(operation, corpus_id, detail)
        }
    }

    pub fn tokenization(operation: Operation, corpus_id: &str, source: EngineError) -> Self {
        Self {
            source: Some(source),
            ..Self::new(
                ErrorKind::TokenizationFailed,
                operation,
                Some(corpus_id),
                "engine raised while tokenizing",
            )
        }
    }

    pub fn invalid_config(
        operation: Operation,
        corpus_id: Option<&str>,
        detail: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::InvalidConfig, operation, corpus_id, detail)
    }

    pub fn lock_timeout(operation: Operation, corpus_id: &str, waited: Duration) -> Self {
        Self::new(
            ErrorKind::LockTimeout,
            operation,
            Some(corpus_id),
            format!("waited {waited:?}"),
        )
    }

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[inline]
    pub fn corpus_id(&self) -> Option<&str> {
        self.corpus_id.as_deref()
    }

    #[inline]
    pub fn operation(&self) -> Operation {
        self.operation
    }

    #[inline]
    pub fn detail(&self) -> &str {
        &self.detail
    }

    #[inline]
    pub fn engine_error(&self) -> Option<&EngineError> {
        self.source.as_ref()
    }
}

/// I/O errors of the request reader.
#[derive(Debug, Error, PartialEq)]
pub enum IoError {
    #[error("File Error: {0}")]
    File(io::ErrorKind),

    #[error("Reader Error: {0}")]
    Reader(io::ErrorKind),
}

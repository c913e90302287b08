//! Multi-corpus BM25 session service.
//!
//! Corpora are created, fed documents and queried through [`Corpora`]. Each
//! corpus compiles its vector index lazily on first read and drops it on the
//! next write.

pub mod cli;
pub mod config;
mod decode;
pub mod document;
pub mod error;
pub mod query;
pub mod read;
pub mod registry;
pub mod service;
pub mod session;
pub mod stats;
pub mod tool;

pub use config::{Bm25Overrides, Settings};
pub use document::{Document, DocumentInput};
pub use error::{Error, ErrorKind, Operation};
pub use query::{Method, QueryOptions, QueryResult, RankedDocument};
pub use service::{Corpora, DeleteOutcome};
pub use session::{CorpusSummary, LearnOutcome};
pub use stats::{CorpusStats, IdfValue, MatrixShape, StatsOptions};

//! Async operation surface over the registry.
//!
//! Every corpus operation resolves its session through the registry, drops
//! the registry lock, then holds the session lock for the rest of the call.
//! Work on one corpus is serialized; different corpora never wait on each
//! other.

use corpus_engine::{Bm25Engine, IndexingEngine};
use serde::Serialize;
use tokio::sync::MutexGuard;

use crate::{
    config::{self, Bm25Overrides, Settings},
    document::DocumentInput,
    error::{Error, ErrorKind, Operation},
    query::{self, Query, QueryOptions, QueryResult},
    registry::{Registry, SessionHandle},
    session::{CorpusSession, CorpusSummary, LearnOutcome},
    stats::{self, CorpusStats, StatsOptions},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub corpus_id: String,
    pub deleted: bool,
}

#[derive(Debug)]
pub struct Corpora<E: IndexingEngine> {
    engine: E,
    registry: Registry<E::Vectorizer>,
    settings: Settings,
}

impl Corpora<Bm25Engine> {
    /// Service backed by the built-in BM25 engine.
    pub fn from_settings(settings: Settings) -> Self {
        Self::new(Bm25Engine::new(settings.engine), settings)
    }
}

impl<E: IndexingEngine> Corpora<E> {
    pub fn new(engine: E, settings: Settings) -> Self {
        Self {
            engine,
            registry: Registry::new(),
            settings,
        }
    }

    #[inline]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[inline]
    pub fn registry(&self) -> &Registry<E::Vectorizer> {
        &self.registry
    }

    /// Locks a resolved session, honouring the configured wait limit. A
    /// session retired while we waited counts as missing.
    async fn lock<'h>(
        &self,
        handle: &'h SessionHandle<E::Vectorizer>,
        operation: Operation,
        corpus_id: &str,
    ) -> Result<MutexGuard<'h, CorpusSession<E::Vectorizer>>, Error> {
        let session = match self.settings.lock_timeout {
            Some(wait) => tokio::time::timeout(wait, handle.lock())
                .await
                .map_err(|_| {
                    tracing::warn!(
                        corpus_id,
                        %operation,
                        ?wait,
                        "gave up waiting for corpus lock"
                    );
                    Error::lock_timeout(operation, corpus_id, wait)
                })?,
            None => handle.lock().await,
        };

        if session.is_retired() {
            return Err(Error::not_found(operation, corpus_id));
        }

        Ok(session)
    }

    pub async fn create_corpus(
        &self,
        corpus_id: Option<String>,
        overrides: Option<Bm25Overrides>,
    ) -> Result<CorpusSummary, Error> {
        let config = overrides.unwrap_or_default().apply(self.settings.bm25);
        config::validate(&config).map_err(|detail| {
            Error::invalid_config(Operation::CreateCorpus, corpus_id.as_deref(), detail)
        })?;

        self.registry.create(corpus_id, config).await
    }

    pub async fn delete_corpus(&self, corpus_id: &str) -> DeleteOutcome {
        DeleteOutcome {
            corpus_id: corpus_id.to_owned(),
            deleted: self.registry.delete(corpus_id).await,
        }
    }

    pub async fn learn_corpus(
        &self,
        corpus_id: &str,
        documents: Vec<DocumentInput>,
        dedupe_by_id: bool,
    ) -> Result<LearnOutcome, Error> {
        let operation = Operation::LearnCorpus;
        let handle = self.registry.resolve(operation, corpus_id).await?;
        let mut session = self.lock(&handle, operation, corpus_id).await?;

        session.learn_documents(&self.engine, documents, dedupe_by_id)
    }

    pub async fn query_corpus(
        &self,
        corpus_id: &str,
        query: &str,
        options: QueryOptions,
    ) -> Result<QueryResult, Error> {
        let operation = Operation::QueryCorpus;
        let handle = self.registry.resolve(operation, corpus_id).await?;
        let mut session = self.lock(&handle, operation, corpus_id).await?;

        let view = session.compiled_view(&self.engine, operation)?;
        query::run(view, &self.engine, Query::new(query), &options)
    }

    pub async fn corpus_stats(
        &self,
        corpus_id: &str,
        options: StatsOptions,
    ) -> Result<CorpusStats, Error> {
        let operation = Operation::CorpusStats;
        let handle = self.registry.resolve(operation, corpus_id).await?;
        let mut session = self.lock(&handle, operation, corpus_id).await?;

        let view = session.compiled_view(&self.engine, operation)?;
        stats::collect(view, &options)
    }

    /// Summaries of every live corpus, ordered by id. Each session is locked
    /// in turn, never two at once. A corpus whose lock outlasts the configured
    /// wait is left out rather than stalling the listing.
    pub async fn list_corpora(&self) -> Vec<CorpusSummary> {
        let mut summaries = Vec::new();

        for (corpus_id, handle) in self.registry.handles().await {
            match self.lock(&handle, Operation::ListCorpora, &corpus_id).await {
                Ok(session) => summaries.push(session.summary()),
                Err(error) if error.kind() == ErrorKind::NotFound => {}
                Err(error) => tracing::warn!(%error, "leaving corpus out of listing"),
            }
        }

        summaries
    }
}

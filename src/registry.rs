//! Corpus id to session map.
//!
//! The map lock is only held across lookups, inserts and removals. Callers
//! get a [`SessionHandle`] back and lock the session after the map lock is
//! gone, so the two locks are never held together by one call.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use chrono::Utc;
use corpus_engine::{Bm25Config, Vectorizer};
use hashbrown::HashMap;
use tokio::sync::Mutex;

use crate::{
    error::{Error, Operation},
    session::{CorpusSession, CorpusSummary},
};

pub type SessionHandle<V> = Arc<Mutex<CorpusSession<V>>>;

#[derive(Debug)]
pub struct Registry<V> {
    sessions: Mutex<HashMap<String, SessionHandle<V>>>,
    sequence: AtomicU64,
}

impl<V: Vectorizer> Default for Registry<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Vectorizer> Registry<V> {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            sequence: AtomicU64::new(0),
        }
    }

    /// `corpus-<unix millis>-<sequence>`; the sequence is process-wide.
    fn generate_id(&self) -> String {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        format!("corpus-{}-{sequence}", Utc::now().timestamp_millis())
    }

    pub async fn create(
        &self,
        corpus_id: Option<String>,
        config: Bm25Config,
    ) -> Result<CorpusSummary, Error> {
        let mut sessions = self.sessions.lock().await;

        let corpus_id = match corpus_id {
            Some(corpus_id) if sessions.contains_key(&corpus_id) => {
                return Err(Error::already_exists(Operation::CreateCorpus, &corpus_id));
            }
            Some(corpus_id) => corpus_id,
            None => loop {
                let candidate = self.generate_id();
                if !sessions.contains_key(&candidate) {
                    break candidate;
                }
            },
        };

        let session = CorpusSession::new(corpus_id.clone(), config);
        let summary = session.summary();
        sessions.insert(corpus_id, Arc::new(Mutex::new(session)));

        tracing::info!(corpus_id = %summary.corpus_id, "corpus created");
        Ok(summary)
    }

    pub async fn resolve(
        &self,
        operation: Operation,
        corpus_id: &str,
    ) -> Result<SessionHandle<V>, Error> {
        self.sessions
            .lock()
            .await
            .get(corpus_id)
            .cloned()
            .ok_or_else(|| Error::not_found(operation, corpus_id))
    }

    /// Removes the corpus once its session lock has been acquired, so an
    /// operation in flight on it finishes first. `false` when there is no
    /// live corpus under `corpus_id`.
    pub async fn delete(&self, corpus_id: &str) -> bool {
        let Some(handle) = self.sessions.lock().await.get(corpus_id).cloned() else {
            return false;
        };

        {
            let mut session = handle.lock().await;
            if session.is_retired() {
                return false;
            }
            session.retire();
        }

        let mut sessions = self.sessions.lock().await;
        if sessions
            .get(corpus_id)
            .is_some_and(|current| Arc::ptr_eq(current, &handle))
        {
            sessions.remove(corpus_id);
        }

        tracing::info!(corpus_id, "corpus deleted");
        true
    }

    /// Snapshot of every live handle, ordered by corpus id.
    pub async fn handles(&self) -> Vec<(String, SessionHandle<V>)> {
        let mut handles = self
            .sessions
            .lock()
            .await
            .iter()
            .map(|(corpus_id, handle)| (corpus_id.clone(), Arc::clone(handle)))
            .collect::<Vec<_>>();

        handles.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        handles
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}

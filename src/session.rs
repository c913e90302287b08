//! Per-corpus state and the lazily compiled index.
//!
//! A [`CorpusSession`] is only ever touched through the lock its registry
//! entry wraps it in. [`CorpusSession::learn_documents`] is the single mutator
//! of the document list and always drops the compiled index, so a present
//! index describes exactly the current documents.

use chrono::{DateTime, Utc};
use corpus_engine::{Bm25Config, IndexingEngine, OutputKind, Vectorizer};
use hashbrown::HashSet;
use serde::Serialize;

use crate::{
    decode,
    document::{Document, DocumentInput},
    error::{Error, Operation},
};

/// Query-ready view of a corpus: vocabulary snapshot plus one vector per
/// document, index-aligned with the document list.
#[derive(Debug)]
pub struct CompiledIndex<V> {
    vectorizer: V,
    terms: Vec<String>,
    document_vectors: Vec<Vec<f64>>,
}

impl<V: Vectorizer> CompiledIndex<V> {
    fn empty(vectorizer: V) -> Self {
        Self {
            vectorizer,
            terms: Vec::new(),
            document_vectors: Vec::new(),
        }
    }

    #[inline]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    #[inline]
    pub fn document_vectors(&self) -> &[Vec<f64>] {
        &self.document_vectors
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.document_vectors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.document_vectors.is_empty()
    }

    #[inline]
    pub(crate) fn vectorizer_mut(&mut self) -> &mut V {
        &mut self.vectorizer
    }
}

#[derive(Debug, Default)]
pub enum Compiled<V> {
    #[default]
    Absent,
    Present(CompiledIndex<V>),
}

impl<V> Compiled<V> {
    #[inline]
    pub fn is_present(&self) -> bool {
        matches!(self, Compiled::Present(_))
    }

    #[inline]
    fn present_mut(&mut self) -> Option<&mut CompiledIndex<V>> {
        match self {
            Compiled::Present(index) => Some(index),
            Compiled::Absent => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusSummary {
    pub corpus_id: String,
    pub document_count: usize,
    pub vocabulary_size: usize,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
    pub config: Bm25Config,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnOutcome {
    pub corpus_id: String,
    pub learned_count: usize,
    pub skipped_count: usize,
    pub total_documents: usize,
    pub vocabulary_size: usize,

    /// Always set: any learn call invalidates the compiled index.
    pub reindex_required: bool,
}

/// Borrowed pieces of a compiled session, handed to query and stats.
pub(crate) struct CompiledView<'s, V> {
    pub corpus_id: &'s str,
    pub documents: &'s [Document],
    pub vocabulary_size: usize,
    pub total_token_count: usize,
    pub index: &'s mut CompiledIndex<V>,
}

#[derive(Debug)]
pub struct CorpusSession<V> {
    id: String,

    // Append-only, insertion order is the ranking tie-break order.
    documents: Vec<Document>,
    ids: HashSet<String>,

    vocabulary: HashSet<String>,
    total_token_count: usize,
    compiled: Compiled<V>,
    config: Bm25Config,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    retired: bool,
}

impl<V: Vectorizer> CorpusSession<V> {
    pub fn new(id: impl Into<String>, config: Bm25Config) -> Self {
        let now = Utc::now();

        Self {
            id: id.into(),
            documents: Vec::new(),
            ids: HashSet::new(),
            vocabulary: HashSet::new(),
            total_token_count: 0,
            compiled: Compiled::Absent,
            config,
            created_at: now,
            updated_at: now,
            retired: false,
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    #[inline]
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    #[inline]
    pub fn total_token_count(&self) -> usize {
        self.total_token_count
    }

    #[inline]
    pub fn config(&self) -> &Bm25Config {
        &self.config
    }

    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[inline]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    #[inline]
    pub fn compiled(&self) -> &Compiled<V> {
        &self.compiled
    }

    /// Set once the corpus has been deleted. A retired session is unreachable
    /// through the registry and rejects every operation.
    #[inline]
    pub fn is_retired(&self) -> bool {
        self.retired
    }

    #[inline]
    pub(crate) fn retire(&mut self) {
        self.retired = true;
        self.compiled = Compiled::Absent;
    }

    pub fn summary(&self) -> CorpusSummary {
        CorpusSummary {
            corpus_id: self.id.clone(),
            document_count: self.documents.len(),
            vocabulary_size: self.vocabulary.len(),
            created_at_ms: self.created_at.timestamp_millis(),
            updated_at_ms: self.updated_at.timestamp_millis(),
            config: self.config,
        }
    }

    /// Appends `inputs` to the corpus.
    ///
    /// The whole batch is tokenized before anything is mutated, so a
    /// tokenization failure leaves the session untouched. With
    /// `dedupe_by_id`, inputs whose id is already stored (or appeared earlier
    /// in the batch) are skipped.
    pub fn learn_documents<E>(
        &mut self,
        engine: &E,
        inputs: Vec<DocumentInput>,
        dedupe_by_id: bool,
    ) -> Result<LearnOutcome, Error>
    where
        E: IndexingEngine<Vectorizer = V>,
    {
        let mut batch_ids = HashSet::new();
        let mut staged = Vec::with_capacity(inputs.len());
        let mut skipped_count = 0;

        for input in inputs {
            if let Some(id) = &input.id {
                if dedupe_by_id && (self.ids.contains(id) || batch_ids.contains(id)) {
                    skipped_count += 1;
                    continue;
                }
                batch_ids.insert(id.clone());
            }

            let tokens = match input.tokens {
                Some(tokens) => tokens,
                None => engine
                    .tokenize(&input.text)
                    .map_err(|error| Error::tokenization(Operation::LearnCorpus, &self.id, error))?
                    .into_strings(),
            };

            staged.push((input.id, input.text, tokens));
        }

        let learned_count = staged.len();

        for (id, text, tokens) in staged {
            let id = match id {
                Some(id) => id,
                None => self.generate_document_id(&batch_ids),
            };

            for token in &tokens {
                if !self.vocabulary.contains(token) {
                    self.vocabulary.insert(token.clone());
                }
            }

            self.total_token_count += tokens.len();
            self.ids.insert(id.clone());
            self.documents.push(Document::new(id, text, tokens));
        }

        self.compiled = Compiled::Absent;
        if learned_count > 0 {
            self.updated_at = Utc::now();
        }

        tracing::debug!(
            corpus_id = %self.id,
            learned_count,
            skipped_count,
            total_documents = self.documents.len(),
            "documents learned"
        );

        Ok(LearnOutcome {
            corpus_id: self.id.clone(),
            learned_count,
            skipped_count,
            total_documents: self.documents.len(),
            vocabulary_size: self.vocabulary.len(),
            reindex_required: true,
        })
    }

    /// `doc-<position>`, suffixed until it clashes with neither a stored id
    /// nor an explicit id of the batch being learned.
    fn generate_document_id(&self, reserved: &HashSet<String>) -> String {
        let base = format!("doc-{}", self.documents.len());
        let taken = |id: &String| self.ids.contains(id) || reserved.contains(id);

        if !taken(&base) {
            return base;
        }

        let mut suffix = 1;
        loop {
            let candidate = format!("{base}-{suffix}");
            if !taken(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }

    /// Returns the compiled index, building it from the current documents on
    /// a cache miss with a vectorizer fresh from `engine`.
    pub fn ensure_compiled<E>(
        &mut self,
        engine: &E,
        operation: Operation,
    ) -> Result<&mut CompiledIndex<V>, Error>
    where
        E: IndexingEngine<Vectorizer = V>,
    {
        if self.compiled.is_present() {
            tracing::debug!(corpus_id = %self.id, "compiled index cache hit");
        } else {
            let index = self.compile(engine, operation)?;
            self.compiled = Compiled::Present(index);
        }

        let id = &self.id;
        self.compiled
            .present_mut()
            .ok_or_else(|| Error::invalid_output(operation, id, "compiled index missing"))
    }

    pub(crate) fn compiled_view<E>(
        &mut self,
        engine: &E,
        operation: Operation,
    ) -> Result<CompiledView<'_, V>, Error>
    where
        E: IndexingEngine<Vectorizer = V>,
    {
        self.ensure_compiled(engine, operation)?;

        let CorpusSession {
            id,
            documents,
            vocabulary,
            total_token_count,
            compiled,
            ..
        } = self;

        let index = compiled
            .present_mut()
            .ok_or_else(|| Error::invalid_output(operation, id, "compiled index missing"))?;

        Ok(CompiledView {
            corpus_id: id,
            documents,
            vocabulary_size: vocabulary.len(),
            total_token_count: *total_token_count,
            index,
        })
    }

    fn compile<E>(&self, engine: &E, operation: Operation) -> Result<CompiledIndex<V>, Error>
    where
        E: IndexingEngine<Vectorizer = V>,
    {
        let mut vectorizer = engine.new_vectorizer(&self.config);

        if self.documents.is_empty() {
            tracing::debug!(corpus_id = %self.id, "compiled empty index");
            return Ok(CompiledIndex::empty(vectorizer));
        }

        for document in &self.documents {
            vectorizer
                .learn(document.tokens())
                .map_err(|error| Error::engine(operation, &self.id, "learning", error))?;
        }

        let terms = vectorizer
            .out(OutputKind::Terms)
            .map_err(|error| Error::engine(operation, &self.id, "reading terms", error))
            .and_then(|output| {
                decode::terms(output)
                    .map_err(|detail| Error::invalid_output(operation, &self.id, detail))
            })?;

        let document_vectors = (0..self.documents.len())
            .map(|index| {
                let vector = vectorizer.doc_vector(index).map_err(|error| {
                    Error::engine(operation, &self.id, "reading document vectors", error)
                })?;
                decode::vector(&vector, terms.len()).map_err(|detail| {
                    let detail = format!("document {index}: {detail}");
                    Error::invalid_output(operation, &self.id, detail)
                })?;
                Ok(vector)
            })
            .collect::<Result<Vec<_>, Error>>()?;

        tracing::debug!(
            corpus_id = %self.id,
            documents = document_vectors.len(),
            terms = terms.len(),
            "compiled index rebuilt"
        );

        Ok(CompiledIndex {
            vectorizer,
            terms,
            document_vectors,
        })
    }
}

#[cfg(test)]
mod tests {
    use corpus_engine::{
        Bm25Config, Bm25Engine, Bm25Vectorizer, EngineError, IndexingEngine, Tokens,
    };

    use super::CorpusSession;
    use crate::{
        document::DocumentInput,
        error::{ErrorKind, Operation},
    };

    /// Refuses to tokenize any text mentioning "boom".
    #[derive(Debug, Default)]
    struct Fussy(Bm25Engine);

    impl IndexingEngine for Fussy {
        type Vectorizer = Bm25Vectorizer;

        fn tokenize(&self, text: &str) -> Result<Tokens, EngineError> {
            if text.contains("boom") {
                return Err(EngineError::Tokenizer("boom".into()));
            }
            self.0.tokenize(text)
        }

        fn new_vectorizer(&self, config: &Bm25Config) -> Bm25Vectorizer {
            self.0.new_vectorizer(config)
        }
    }

    fn session() -> CorpusSession<Bm25Vectorizer> {
        CorpusSession::new("c1", Bm25Config::default())
    }

    #[test]
    fn test_learn_counts_tokens_and_vocabulary() {
        let engine = Bm25Engine::default();
        let mut session = session();

        let outcome = session
            .learn_documents(
                &engine,
                vec![
                    DocumentInput::new("a", "Cats purr"),
                    DocumentInput::new("b", "dogs bark at cats"),
                ],
                true,
            )
            .unwrap();

        assert_eq!(outcome.learned_count, 2);
        assert_eq!(outcome.skipped_count, 0);
        assert_eq!(outcome.total_documents, 2);
        assert_eq!(outcome.vocabulary_size, 5);
        assert!(outcome.reindex_required);
        assert_eq!(session.total_token_count(), 6);
        assert_eq!(session.documents()[0].tokens(), ["cats", "purr"]);
    }

    #[test]
    fn test_learn_dedupe_by_id() {
        let engine = Bm25Engine::default();
        let mut session = session();

        session
            .learn_documents(&engine, vec![DocumentInput::new("a", "cats purr")], true)
            .unwrap();
        let outcome = session
            .learn_documents(&engine, vec![DocumentInput::new("a", "cats purr")], true)
            .unwrap();

        assert_eq!(outcome.learned_count, 0);
        assert_eq!(outcome.skipped_count, 1);
        assert_eq!(outcome.total_documents, 1);
        assert_eq!(session.total_token_count(), 2);
    }

    #[test]
    fn test_learn_dedupe_within_batch() {
        let engine = Bm25Engine::default();
        let mut session = session();

        let outcome = session
            .learn_documents(
                &engine,
                vec![
                    DocumentInput::new("a", "cats purr"),
                    DocumentInput::new("a", "something else"),
                ],
                true,
            )
            .unwrap();

        assert_eq!(outcome.learned_count, 1);
        assert_eq!(outcome.skipped_count, 1);
        assert_eq!(session.documents()[0].text(), "cats purr");
    }

    #[test]
    fn test_learn_without_dedupe_keeps_duplicates() {
        let engine = Bm25Engine::default();
        let mut session = session();

        let input = vec![DocumentInput::new("a", "cats"), DocumentInput::new("a", "cats")];
        let outcome = session.learn_documents(&engine, input, false).unwrap();

        assert_eq!(outcome.learned_count, 2);
        assert_eq!(outcome.total_documents, 2);
    }

    #[test]
    fn test_learn_generates_unique_ids() {
        let engine = Bm25Engine::default();
        let mut session = session();

        session
            .learn_documents(
                &engine,
                vec![
                    DocumentInput::anonymous("first"),
                    DocumentInput::new("doc-1", "explicit"),
                    DocumentInput::anonymous("third"),
                ],
                true,
            )
            .unwrap();

        let ids = session
            .documents()
            .iter()
            .map(|document| document.id())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["doc-0", "doc-1", "doc-2"]);

        session
            .learn_documents(&engine, vec![DocumentInput::anonymous("fourth")], true)
            .unwrap();
        assert_eq!(session.documents()[3].id(), "doc-3");
    }

    #[test]
    fn test_learn_uses_precomputed_tokens() {
        let engine = Bm25Engine::default();
        let mut session = session();

        session
            .learn_documents(
                &engine,
                vec![DocumentInput::new("a", "ignored text").with_tokens(["x", "y", "x"])],
                true,
            )
            .unwrap();

        assert_eq!(session.total_token_count(), 3);
        assert_eq!(session.vocabulary_size(), 2);
    }

    #[test]
    fn test_learn_batch_is_atomic_on_tokenize_failure() {
        let engine = Fussy::default();
        let mut session = session();

        session
            .learn_documents(&engine, vec![DocumentInput::new("a", "cats purr")], true)
            .unwrap();
        session.ensure_compiled(&engine, Operation::QueryCorpus).unwrap();

        let error = session
            .learn_documents(
                &engine,
                vec![
                    DocumentInput::new("b", "dogs bark"),
                    DocumentInput::new("c", "boom"),
                ],
                true,
            )
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::TokenizationFailed);
        assert_eq!(error.corpus_id(), Some("c1"));
        assert_eq!(session.documents().len(), 1);
        assert_eq!(session.vocabulary_size(), 2);
        assert!(session.compiled().is_present());
    }

    #[test]
    fn test_learn_invalidates_compiled_index() {
        let engine = Bm25Engine::default();
        let mut session = session();

        session
            .learn_documents(&engine, vec![DocumentInput::new("a", "cats purr")], true)
            .unwrap();
        session.ensure_compiled(&engine, Operation::QueryCorpus).unwrap();
        assert!(session.compiled().is_present());

        session
            .learn_documents(&engine, vec![DocumentInput::new("b", "dogs bark")], true)
            .unwrap();
        assert!(!session.compiled().is_present());

        let index = session.ensure_compiled(&engine, Operation::QueryCorpus).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.terms(), ["bark", "cats", "dogs", "purr"]);
    }

    #[test]
    fn test_compile_is_stable_without_learn() {
        let engine = Bm25Engine::default();
        let mut session = session();

        session
            .learn_documents(
                &engine,
                vec![
                    DocumentInput::new("a", "cats purr"),
                    DocumentInput::new("b", "dogs bark at cats"),
                ],
                true,
            )
            .unwrap();

        let first = session.ensure_compiled(&engine, Operation::CorpusStats).unwrap();
        let (terms, vectors) = (first.terms().to_vec(), first.document_vectors().to_vec());

        // Force a rebuild from scratch and compare.
        session.compiled = super::Compiled::Absent;
        let second = session.ensure_compiled(&engine, Operation::CorpusStats).unwrap();

        assert_eq!(second.terms(), terms.as_slice());
        assert_eq!(second.document_vectors(), vectors.as_slice());
    }

    #[test]
    fn test_compile_empty_corpus() {
        let engine = Bm25Engine::default();
        let mut session = session();

        let index = session.ensure_compiled(&engine, Operation::QueryCorpus).unwrap();
        assert!(index.is_empty());
        assert!(index.terms().is_empty());
    }

    #[test]
    fn test_summary() {
        let session = session();
        let summary = session.summary();

        assert_eq!(summary.corpus_id, "c1");
        assert_eq!(summary.document_count, 0);
        assert_eq!(summary.created_at_ms, session.created_at().timestamp_millis());
    }
}

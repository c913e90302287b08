//! Cosine ranking of a query against a compiled corpus.

use std::ops::Deref;

use corpus_engine::{EngineError, IndexingEngine, Tokens, Vectorizer};
use serde::{Deserialize, Serialize};

use crate::{
    decode,
    error::{Error, Operation},
    session::CompiledView,
};

#[derive(Debug)]
pub struct Query<'a>(&'a str);

impl<'a> Query<'a> {
    #[inline]
    pub fn new(value: &'a str) -> Self {
        Self(value)
    }

    #[inline]
    pub fn tokenize<E: IndexingEngine>(&self, engine: &E) -> Result<Tokens, EngineError> {
        engine.tokenize(self.0)
    }
}

impl<'a> Deref for Query<'a> {
    type Target = &'a str;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for Query<'_> {
    #[inline]
    fn as_ref(&self) -> &str {
        self.0
    }
}

/// Scoring method reported with every result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Method {
    #[default]
    #[serde(rename = "vector.cosine")]
    VectorCosine,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryOptions {
    /// Rows to return. `None` returns every document.
    #[serde(default)]
    pub top_n: Option<usize>,

    #[serde(default)]
    pub include_text: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedDocument {
    pub index: usize,
    pub id: String,
    pub score: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub corpus_id: String,
    pub query: String,
    pub method: Method,
    pub ranked: Vec<RankedDocument>,
    pub total_documents: usize,
    pub returned: usize,
}

/// Non-finite scores count as no match; negative zero is folded into zero so
/// it ties with positive zero.
#[inline]
pub fn coerce(score: f64) -> f64 {
    if score.is_finite() && score != 0.0 {
        score
    } else {
        0.0
    }
}

/// Orders `(index, score)` pairs by score descending, ties by ascending
/// index, and keeps the first `top_n`.
pub fn rank(scores: &[f64], top_n: Option<usize>) -> Vec<(usize, f64)> {
    let mut ranked = scores
        .iter()
        .map(|&score| coerce(score))
        .enumerate()
        .collect::<Vec<_>>();

    ranked.sort_unstable_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(top_n.unwrap_or(scores.len()).min(scores.len()));
    ranked
}

pub(crate) fn run<E: IndexingEngine>(
    view: CompiledView<'_, E::Vectorizer>,
    engine: &E,
    query: Query<'_>,
    options: &QueryOptions,
) -> Result<QueryResult, Error> {
    let operation = Operation::QueryCorpus;
    let CompiledView {
        corpus_id,
        documents,
        index,
        ..
    } = view;

    let mut result = QueryResult {
        corpus_id: corpus_id.to_owned(),
        query: query.as_ref().to_owned(),
        method: Method::VectorCosine,
        ranked: Vec::new(),
        total_documents: documents.len(),
        returned: 0,
    };

    if documents.is_empty() {
        return Ok(result);
    }

    let tokens = query
        .tokenize(engine)
        .map_err(|error| Error::tokenization(operation, corpus_id, error))?
        .into_strings();

    let columns = index.terms().len();
    let query_vector = index
        .vectorizer_mut()
        .vector_of(&tokens)
        .map_err(|error| Error::engine(operation, corpus_id, "vectorizing the query", error))?;
    decode::vector(&query_vector, columns)
        .map_err(|detail| Error::invalid_output(operation, corpus_id, format!("query: {detail}")))?;

    let scores = index
        .document_vectors()
        .iter()
        .map(|vector| engine.cosine(&query_vector, vector))
        .collect::<Vec<_>>();

    let non_finite = scores.iter().filter(|score| !score.is_finite()).count();
    if non_finite > 0 {
        tracing::warn!(corpus_id, non_finite, "non-finite scores coerced to 0");
    }

    result.ranked = rank(&scores, options.top_n)
        .into_iter()
        .map(|(position, score)| {
            let document = &documents[position];
            RankedDocument {
                index: position,
                id: document.id().to_owned(),
                score,
                text: options.include_text.then(|| document.text().to_owned()),
            }
        })
        .collect();
    result.returned = result.ranked.len();

    tracing::debug!(
        corpus_id,
        tokens = tokens.len(),
        returned = result.returned,
        "query ranked"
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::{coerce, rank, Method, Query};

    #[test]
    fn test_rank_orders_by_score_then_index() {
        let ranked = rank(&[0.2, 0.9, 0.2, 0.5], None);
        assert_eq!(ranked, vec![(1, 0.9), (3, 0.5), (0, 0.2), (2, 0.2)]);
    }

    #[test]
    fn test_rank_truncates() {
        assert_eq!(rank(&[0.1, 0.3, 0.2], Some(2)), vec![(1, 0.3), (2, 0.2)]);
        assert_eq!(rank(&[0.1, 0.3], Some(10)).len(), 2);
        assert!(rank(&[0.1, 0.3], Some(0)).is_empty());
        assert!(rank(&[], None).is_empty());
    }

    #[test]
    fn test_rank_coerces_non_finite() {
        let ranked = rank(&[f64::NAN, 0.4, f64::INFINITY, -0.0], None);
        assert_eq!(ranked, vec![(1, 0.4), (0, 0.0), (2, 0.0), (3, 0.0)]);
    }

    #[test]
    fn test_coerce() {
        assert_eq!(coerce(0.25), 0.25);
        assert_eq!(coerce(f64::NEG_INFINITY), 0.0);
        assert!(coerce(-0.0).is_sign_positive());
    }

    #[test]
    fn test_method_tag() {
        assert_eq!(
            serde_json::to_string(&Method::VectorCosine).unwrap(),
            r#""vector.cosine""#
        );
    }

    #[test]
    fn test_query_deref() {
        let query = Query::new("cats");
        assert_eq!(*query, "cats");
        assert_eq!(query.as_ref(), "cats");
    }
}

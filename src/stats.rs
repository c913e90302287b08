use corpus_engine::{OutputKind, Vectorizer};
use serde::{Deserialize, Serialize};

use crate::{
    decode,
    error::{Error, Operation},
    session::CompiledView,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsOptions {
    #[serde(default)]
    pub include_idf: bool,

    #[serde(default)]
    pub include_matrix: bool,

    /// Keep only this many idf entries. `None` keeps all.
    #[serde(default)]
    pub top_idf_terms: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IdfValue {
    pub term: String,
    pub idf: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MatrixShape {
    pub rows: usize,
    pub cols: usize,
}

/// `idf_values`, `document_term_matrix` and `matrix_shape` are `None` unless
/// asked for.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusStats {
    pub corpus_id: String,
    pub total_documents: usize,
    pub vocabulary_size: usize,
    pub average_document_length: f64,
    pub terms: Vec<String>,
    pub idf_values: Option<Vec<IdfValue>>,
    pub document_term_matrix: Option<Vec<Vec<f64>>>,
    pub matrix_shape: Option<MatrixShape>,
}

/// Highest idf first, ties by term.
fn rank_idf(pairs: Vec<(String, f64)>, top: Option<usize>) -> Vec<IdfValue> {
    let mut values = pairs
        .into_iter()
        .map(|(term, idf)| IdfValue { term, idf })
        .collect::<Vec<_>>();

    values.sort_unstable_by(|a, b| b.idf.total_cmp(&a.idf).then_with(|| a.term.cmp(&b.term)));
    if let Some(top) = top {
        values.truncate(top);
    }
    values
}

pub(crate) fn collect<V: Vectorizer>(
    view: CompiledView<'_, V>,
    options: &StatsOptions,
) -> Result<CorpusStats, Error> {
    let operation = Operation::CorpusStats;
    let CompiledView {
        corpus_id,
        documents,
        vocabulary_size,
        total_token_count,
        index,
    } = view;

    let total_documents = documents.len();
    let columns = index.terms().len();

    let average_document_length = if total_documents == 0 {
        0.0
    } else {
        total_token_count as f64 / total_documents as f64
    };

    // An empty corpus never reached the engine, there is nothing to read.
    let consult = total_documents > 0;

    let idf_values = if !options.include_idf {
        None
    } else if !consult {
        Some(Vec::new())
    } else {
        let output = index
            .vectorizer_mut()
            .out(OutputKind::Idf)
            .map_err(|error| Error::engine(operation, corpus_id, "reading idf", error))?;
        let pairs = decode::idf(output, columns)
            .map_err(|detail| Error::invalid_output(operation, corpus_id, detail))?;

        Some(rank_idf(pairs, options.top_idf_terms))
    };

    let document_term_matrix = if !options.include_matrix {
        None
    } else if !consult {
        Some(Vec::new())
    } else {
        let output = index
            .vectorizer_mut()
            .out(OutputKind::DocTermMatrix)
            .map_err(|error| Error::engine(operation, corpus_id, "reading the matrix", error))?;

        Some(
            decode::matrix(output, total_documents, columns)
                .map_err(|detail| Error::invalid_output(operation, corpus_id, detail))?,
        )
    };

    let matrix_shape = document_term_matrix.as_ref().map(|matrix| MatrixShape {
        rows: matrix.len(),
        cols: columns,
    });

    Ok(CorpusStats {
        corpus_id: corpus_id.to_owned(),
        total_documents,
        vocabulary_size,
        average_document_length,
        terms: index.terms().to_vec(),
        idf_values,
        document_term_matrix,
        matrix_shape,
    })
}

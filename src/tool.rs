//! JSON tool-call layer.
//!
//! One request object in, one response object out. Requests are tagged by
//! `"op"`; responses are `{"ok":true,"result":…}` or
//! `{"ok":false,"error":{…}}`. Nothing here panics on bad input.

use corpus_engine::IndexingEngine;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    config::Bm25Overrides,
    document::DocumentInput,
    error::{Error, ErrorKind, Operation},
    query::QueryOptions,
    service::Corpora,
    stats::StatsOptions,
};

fn dedupe_default() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "op")]
pub enum Request {
    #[serde(rename_all = "camelCase")]
    CreateCorpus {
        #[serde(default)]
        corpus_id: Option<String>,
        #[serde(default)]
        bm25_config: Option<Bm25Overrides>,
    },

    #[serde(rename_all = "camelCase")]
    DeleteCorpus { corpus_id: String },

    #[serde(rename_all = "camelCase")]
    LearnCorpus {
        corpus_id: String,
        documents: Vec<DocumentInput>,
        #[serde(default = "dedupe_default")]
        dedupe_by_id: bool,
    },

    #[serde(rename_all = "camelCase")]
    QueryCorpus {
        corpus_id: String,
        query: String,
        #[serde(default)]
        top_n: Option<usize>,
        #[serde(default)]
        include_text: bool,
    },

    #[serde(rename_all = "camelCase")]
    CorpusStats {
        corpus_id: String,
        #[serde(default)]
        include_idf: bool,
        #[serde(default)]
        include_matrix: bool,
        #[serde(default)]
        top_idf_terms: Option<usize>,
    },

    ListCorpora,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub kind: ErrorKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub corpus_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<Operation>,

    pub message: String,
}

impl From<&Error> for ErrorBody {
    fn from(error: &Error) -> Self {
        let message = match error.engine_error() {
            Some(source) => format!("{error}: {source}"),
            None => error.to_string(),
        };

        Self {
            kind: error.kind(),
            corpus_id: error.corpus_id().map(str::to_owned),
            operation: Some(error.operation()),
            message,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Response {
    pub ok: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl Response {
    pub fn success<T: Serialize>(result: &T) -> Self {
        match serde_json::to_value(result) {
            Ok(value) => Self {
                ok: true,
                result: Some(value),
                error: None,
            },
            Err(error) => Self::failure(ErrorBody {
                kind: ErrorKind::InvalidRequest,
                corpus_id: None,
                operation: None,
                message: error.to_string(),
            }),
        }
    }

    pub fn failure(error: ErrorBody) -> Self {
        Self {
            ok: false,
            result: None,
            error: Some(error),
        }
    }

    fn from_result<T: Serialize>(result: Result<T, Error>) -> Self {
        match result {
            Ok(result) => Self::success(&result),
            Err(error) => {
                tracing::debug!(%error, "operation failed");
                Self::failure(ErrorBody::from(&error))
            }
        }
    }
}

pub async fn handle<E: IndexingEngine>(corpora: &Corpora<E>, request: Request) -> Response {
    match request {
        Request::CreateCorpus {
            corpus_id,
            bm25_config,
        } => Response::from_result(corpora.create_corpus(corpus_id, bm25_config).await),

        Request::DeleteCorpus { corpus_id } => {
            Response::success(&corpora.delete_corpus(&corpus_id).await)
        }

        Request::LearnCorpus {
            corpus_id,
            documents,
            dedupe_by_id,
        } => Response::from_result(
            corpora
                .learn_corpus(&corpus_id, documents, dedupe_by_id)
                .await,
        ),

        Request::QueryCorpus {
            corpus_id,
            query,
            top_n,
            include_text,
        } => {
            let options = QueryOptions {
                top_n,
                include_text,
            };
            Response::from_result(corpora.query_corpus(&corpus_id, &query, options).await)
        }

        Request::CorpusStats {
            corpus_id,
            include_idf,
            include_matrix,
            top_idf_terms,
        } => {
            let options = StatsOptions {
                include_idf,
                include_matrix,
                top_idf_terms,
            };
            Response::from_result(corpora.corpus_stats(&corpus_id, options).await)
        }

        Request::ListCorpora => Response::success(&corpora.list_corpora().await),
    }
}

/// Decodes one JSON request and dispatches it.
pub async fn handle_line<E: IndexingEngine>(corpora: &Corpora<E>, line: &str) -> Response {
    match serde_json::from_str::<Request>(line) {
        Ok(request) => handle(corpora, request).await,
        Err(error) => Response::failure(ErrorBody {
            kind: ErrorKind::InvalidRequest,
            corpus_id: None,
            operation: None,
            message: error.to_string(),
        }),
    }
}

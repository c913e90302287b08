//! BM25 weighted bag-of-words vectorizer.
//!
//! Documents are learned one token list at a time. The first read (a vector,
//! a term list, the idf table) freezes the model: average document length,
//! idf and every document vector are computed once and learning is closed
//! from then on. Callers that need to add documents build a new vectorizer.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::{
    count::TermCounter,
    engine::Vectorizer,
    error::EngineError,
    output::{EngineOutput, OutputKind},
};

/// Decimal places used when [`Bm25Config::precision`] is not set.
pub const DEFAULT_PRECISION: u32 = 6;

/// Vector normalization applied after weighting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    #[default]
    None,
    L1,
    L2,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bm25Config {
    /// Term-frequency saturation.
    pub k1: f64,

    /// Document length normalization.
    pub b: f64,

    /// IDF saturation.
    pub k: f64,

    pub norm: Norm,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
}

impl Default for Bm25Config {
    fn default() -> Self {
        Self {
            k1: 1.2,
            b: 0.75,
            k: 1.0,
            norm: Norm::None,
            precision: None,
        }
    }
}

impl Bm25Config {
    #[inline]
    fn round(&self, value: f64) -> f64 {
        let factor = 10f64.powi(self.precision.unwrap_or(DEFAULT_PRECISION) as i32);
        (value * factor).round() / factor
    }
}

#[derive(Debug)]
struct Weights {
    terms: Vec<String>,
    positions: HashMap<String, usize>,
    idf: Vec<f64>,
    average_length: f64,
    vectors: Vec<Vec<f64>>,
}

#[derive(Debug)]
pub struct Bm25Vectorizer {
    config: Bm25Config,
    bags: Vec<TermCounter>,
    lengths: Vec<usize>,

    // Number of documents containing each term.
    document_frequency: TermCounter,

    total_length: usize,
    weights: Option<Weights>,
}

impl Bm25Vectorizer {
    pub fn new(config: Bm25Config) -> Self {
        Self {
            config,
            bags: Vec::new(),
            lengths: Vec::new(),
            document_frequency: TermCounter::new(),
            total_length: 0,
            weights: None,
        }
    }

    #[inline]
    pub fn config(&self) -> &Bm25Config {
        &self.config
    }

    /// Number of learned documents.
    #[inline]
    pub fn len(&self) -> usize {
        self.bags.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bags.is_empty()
    }

    #[inline]
    pub fn is_compiled(&self) -> bool {
        self.weights.is_some()
    }

    fn weights(&mut self) -> Result<&Weights, EngineError> {
        if self.bags.is_empty() {
            return Err(EngineError::Empty);
        }

        if self.weights.is_none() {
            let weights = self.compute();
            tracing::trace!(
                documents = self.bags.len(),
                terms = weights.terms.len(),
                "bm25 weights computed"
            );
            self.weights = Some(weights);
        }

        self.weights.as_ref().ok_or(EngineError::Empty)
    }

    fn compute(&self) -> Weights {
        let total_documents = self.bags.len() as f64;
        let average_length = self.total_length as f64 / total_documents;

        let mut terms = self
            .document_frequency
            .terms()
            .map(str::to_owned)
            .collect::<Vec<_>>();
        terms.sort_unstable();

        let positions = terms
            .iter()
            .enumerate()
            .map(|(position, term)| (term.clone(), position))
            .collect::<HashMap<_, _>>();

        let idf = terms
            .iter()
            .map(|term| {
                let frequency = self.document_frequency.get(term) as f64;
                let idf = ((total_documents - frequency + 0.5) / (frequency + 0.5) + self.config.k)
                    .ln();
                self.config.round(idf)
            })
            .collect();

        let mut weights = Weights {
            terms,
            positions,
            idf,
            average_length,
            vectors: Vec::with_capacity(self.bags.len()),
        };

        let vectors = self
            .bags
            .iter()
            .zip(&self.lengths)
            .map(|(bag, &length)| weigh(&self.config, &weights, bag, length))
            .collect();
        weights.vectors = vectors;

        weights
    }
}

/// BM25 vector of one bag of words over the frozen vocabulary.
fn weigh(config: &Bm25Config, weights: &Weights, bag: &TermCounter, length: usize) -> Vec<f64> {
    let mut vector = vec![0.0; weights.terms.len()];

    let relative_length = if weights.average_length > 0.0 {
        length as f64 / weights.average_length
    } else {
        0.0
    };
    let normalizer = (1.0 - config.b) + config.b * relative_length;

    for (term, frequency) in bag.iter() {
        if let Some(&position) = weights.positions.get(term) {
            let frequency = frequency as f64;
            vector[position] = frequency * (config.k1 + 1.0)
                / (config.k1 * normalizer + frequency)
                * weights.idf[position];
        }
    }

    normalize(&mut vector, config.norm);
    vector.iter_mut().for_each(|weight| *weight = config.round(*weight));
    vector
}

fn normalize(vector: &mut [f64], norm: Norm) {
    let length = match norm {
        Norm::None => return,
        Norm::L1 => vector.iter().map(|weight| weight.abs()).sum::<f64>(),
        Norm::L2 => vector.iter().map(|weight| weight * weight).sum::<f64>().sqrt(),
    };

    if length > 0.0 {
        vector.iter_mut().for_each(|weight| *weight /= length);
    }
}

impl Vectorizer for Bm25Vectorizer {
    fn learn(&mut self, tokens: &[String]) -> Result<(), EngineError> {
        if self.weights.is_some() {
            return Err(EngineError::AlreadyCompiled);
        }

        let bag = TermCounter::from_terms(tokens);
        bag.terms()
            .for_each(|term| self.document_frequency.insert(term));

        self.total_length += tokens.len();
        self.lengths.push(tokens.len());
        self.bags.push(bag);

        Ok(())
    }

    fn vector_of(&mut self, tokens: &[String]) -> Result<Vec<f64>, EngineError> {
        let config = self.config;
        let weights = self.weights()?;
        let bag = TermCounter::from_terms(tokens);

        Ok(weigh(&config, weights, &bag, tokens.len()))
    }

    fn doc_vector(&mut self, index: usize) -> Result<Vec<f64>, EngineError> {
        let len = self.bags.len();

        self.weights()?
            .vectors
            .get(index)
            .cloned()
            .ok_or(EngineError::DocumentOutOfRange { index, len })
    }

    fn out(&mut self, kind: OutputKind) -> Result<EngineOutput, EngineError> {
        let weights = self.weights()?;

        Ok(match kind {
            OutputKind::Terms => EngineOutput::Terms(weights.terms.clone()),
            OutputKind::Idf => EngineOutput::Idf(
                weights
                    .terms
                    .iter()
                    .cloned()
                    .zip(weights.idf.iter().copied())
                    .collect(),
            ),
            OutputKind::DocTermMatrix => EngineOutput::DocTermMatrix(weights.vectors.clone()),
        })
    }
}

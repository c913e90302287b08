//! Shape validation of engine output.
//!
//! The engine is an external collaborator; nothing it returns is trusted
//! until it has been decoded against the expected tag and arity here.
//! Failures are descriptions, callers attach corpus and operation context.

use corpus_engine::{EngineOutput, OutputKind};
use hashbrown::HashSet;

fn unexpected(expected: OutputKind, output: &EngineOutput) -> String {
    format!("expected {expected} output, got {}", output.kind())
}

pub(crate) fn terms(output: EngineOutput) -> Result<Vec<String>, String> {
    let terms = match output {
        EngineOutput::Terms(terms) => terms,
        other => return Err(unexpected(OutputKind::Terms, &other)),
    };

    {
        let mut seen = HashSet::with_capacity(terms.len());
        if let Some(duplicate) = terms.iter().find(|term| !seen.insert(term.as_str())) {
            return Err(format!("duplicate term {duplicate:?}"));
        }
    }

    Ok(terms)
}

pub(crate) fn idf(output: EngineOutput, columns: usize) -> Result<Vec<(String, f64)>, String> {
    let pairs = match output {
        EngineOutput::Idf(pairs) => pairs,
        other => return Err(unexpected(OutputKind::Idf, &other)),
    };

    if pairs.len() != columns {
        return Err(format!(
            "idf has {} entries, vocabulary has {columns} terms",
            pairs.len()
        ));
    }
    if let Some((term, value)) = pairs.iter().find(|(_, value)| !value.is_finite()) {
        return Err(format!("idf of {term:?} is not finite ({value})"));
    }

    Ok(pairs)
}

pub(crate) fn matrix(
    output: EngineOutput,
    rows: usize,
    columns: usize,
) -> Result<Vec<Vec<f64>>, String> {
    let matrix = match output {
        EngineOutput::DocTermMatrix(matrix) => matrix,
        other => return Err(unexpected(OutputKind::DocTermMatrix, &other)),
    };

    if matrix.len() != rows {
        return Err(format!(
            "matrix has {} rows, corpus has {rows} documents",
            matrix.len()
        ));
    }
    for row in &matrix {
        vector(row, columns)?;
    }

    Ok(matrix)
}

/// A vector must span the whole vocabulary and hold finite weights only.
pub(crate) fn vector(vector: &[f64], columns: usize) -> Result<(), String> {
    if vector.len() != columns {
        return Err(format!(
            "vector has {} dimensions, vocabulary has {columns} terms",
            vector.len()
        ));
    }
    if let Some(position) = vector.iter().position(|weight| !weight.is_finite()) {
        return Err(format!("vector weight at {position} is not finite"));
    }

    Ok(())
}

use std::fmt::{Display, Formatter};

/// Which structure to read back from a vectorizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutputKind {
    Terms,
    Idf,
    DocTermMatrix,
}

impl OutputKind {
    pub fn name(&self) -> &'static str {
        match self {
            OutputKind::Terms => "terms",
            OutputKind::Idf => "idf",
            OutputKind::DocTermMatrix => "docTermMatrix",
        }
    }
}

impl Display for OutputKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Tagged result of [`crate::Vectorizer::out`]. Callers decode it against the
/// kind they asked for instead of trusting the shape.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineOutput {
    Terms(Vec<String>),
    Idf(Vec<(String, f64)>),
    DocTermMatrix(Vec<Vec<f64>>),
}

impl EngineOutput {
    pub fn kind(&self) -> OutputKind {
        match self {
            EngineOutput::Terms(_) => OutputKind::Terms,
            EngineOutput::Idf(_) => OutputKind::Idf,
            EngineOutput::DocTermMatrix(_) => OutputKind::DocTermMatrix,
        }
    }
}

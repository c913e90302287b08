#[inline]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[inline]
pub fn magnitude(vector: &[f64]) -> f64 {
    dot(vector, vector).sqrt()
}

/// Cosine of the angle between `a` and `b`.
///
/// Returns NaN when either vector has zero length; callers decide how to treat it.
pub fn cosine(a: &[f64], b: &[f64]) -> f64 {
    dot(a, b) / (magnitude(a) * magnitude(b))
}

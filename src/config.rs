use std::time::Duration;

use corpus_engine::{Bm25Config, EngineOptions, Norm};
use serde::{Deserialize, Serialize};

/// Largest accepted `precision`; beyond this f64 rounding is meaningless.
pub const MAX_PRECISION: u32 = 15;

/// Partial BM25 configuration supplied at corpus creation. Unset fields fall
/// back to the service default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Bm25Overrides {
    pub k1: Option<f64>,
    pub b: Option<f64>,
    pub k: Option<f64>,
    pub norm: Option<Norm>,
    pub precision: Option<u32>,
}

impl Bm25Overrides {
    pub fn apply(&self, base: Bm25Config) -> Bm25Config {
        Bm25Config {
            k1: self.k1.unwrap_or(base.k1),
            b: self.b.unwrap_or(base.b),
            k: self.k.unwrap_or(base.k),
            norm: self.norm.unwrap_or(base.norm),
            precision: self.precision.or(base.precision),
        }
    }
}

/// Checks parameter ranges, returning a description of the first violation.
pub fn validate(config: &Bm25Config) -> Result<(), String> {
    let finite = |name: &str, value: f64| {
        if value.is_finite() {
            Ok(())
        } else {
            Err(format!("{name} must be finite, got {value}"))
        }
    };

    finite("k1", config.k1)?;
    finite("b", config.b)?;
    finite("k", config.k)?;

    if config.k1 < 0.0 {
        return Err(format!("k1 must be non-negative, got {}", config.k1));
    }
    if !(0.0..=1.0).contains(&config.b) {
        return Err(format!("b must be within [0, 1], got {}", config.b));
    }
    if config.k < 0.0 {
        return Err(format!("k must be non-negative, got {}", config.k));
    }
    if let Some(precision) = config.precision {
        if precision > MAX_PRECISION {
            return Err(format!(
                "precision must be at most {MAX_PRECISION}, got {precision}"
            ));
        }
    }

    Ok(())
}

/// Service-wide settings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Settings {
    /// Configuration new corpora start from.
    pub bm25: Bm25Config,

    pub engine: EngineOptions,

    /// Upper bound on waiting for a corpus lock. `None` waits indefinitely.
    pub lock_timeout: Option<Duration>,
}

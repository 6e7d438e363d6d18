//! Fitted numeric scalers applied around the model

use serde::{Deserialize, Serialize};

use crate::{Result, TennisError};

/// A fitted per-feature scaler.
///
/// `Standard` computes `(x - mean) / scale`, `MinMax` computes
/// `x * scale + min`. Zero scale entries are treated as 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scaler {
    Standard { mean: Vec<f64>, scale: Vec<f64> },
    MinMax { min: Vec<f64>, scale: Vec<f64> },
}

impl Scaler {
    /// Number of features this scaler was fit on
    pub fn dim(&self) -> usize {
        match self {
            Scaler::Standard { mean, .. } => mean.len(),
            Scaler::MinMax { min, .. } => min.len(),
        }
    }

    /// Check that offset and scale vectors agree in length
    pub fn validate(&self) -> Result<()> {
        let (offset, scale) = self.params();
        if offset.len() != scale.len() {
            return Err(TennisError::ShapeMismatch {
                what: "scaler parameters".to_string(),
                expected: offset.len(),
                actual: scale.len(),
            });
        }
        Ok(())
    }

    /// Scale a raw feature vector
    pub fn transform(&self, x: &[f64]) -> Result<Vec<f64>> {
        self.check_dim(x)?;
        let (offset, scale) = self.params();
        let scaled = x
            .iter()
            .zip(offset.iter().zip(scale.iter()))
            .map(|(v, (o, s))| match self {
                Scaler::Standard { .. } => (v - o) / nonzero(*s),
                Scaler::MinMax { .. } => v * nonzero(*s) + o,
            })
            .collect();
        Ok(scaled)
    }

    /// Undo [`Scaler::transform`]
    pub fn inverse_transform(&self, x: &[f64]) -> Result<Vec<f64>> {
        self.check_dim(x)?;
        let (offset, scale) = self.params();
        let raw = x
            .iter()
            .zip(offset.iter().zip(scale.iter()))
            .map(|(v, (o, s))| match self {
                Scaler::Standard { .. } => v * nonzero(*s) + o,
                Scaler::MinMax { .. } => (v - o) / nonzero(*s),
            })
            .collect();
        Ok(raw)
    }

    fn params(&self) -> (&[f64], &[f64]) {
        match self {
            Scaler::Standard { mean, scale } => (mean.as_slice(), scale.as_slice()),
            Scaler::MinMax { min, scale } => (min.as_slice(), scale.as_slice()),
        }
    }

    fn check_dim(&self, x: &[f64]) -> Result<()> {
        if x.len() != self.dim() {
            return Err(TennisError::ShapeMismatch {
                what: "scaler input".to_string(),
                expected: self.dim(),
                actual: x.len(),
            });
        }
        Ok(())
    }
}

fn nonzero(s: f64) -> f64 {
    if s == 0.0 {
        1.0
    } else {
        s
    }
}

/// Input and output scalers fit alongside the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerBundle {
    pub input_scaler: Scaler,
    pub output_scaler: Scaler,
}

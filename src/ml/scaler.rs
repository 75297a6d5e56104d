//! Z-score feature scaling, applied as `(x - mean) / scale`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{KanteiError, Result};

fn default_scaler_type() -> String {
    "StandardScaler".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    #[serde(default = "default_scaler_type")]
    pub scaler_type: String,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        Self {
            scaler_type: default_scaler_type(),
            mean,
            scale,
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        let scaler: Self = serde_json::from_str(&content)?;
        scaler
            .validate()
            .map_err(|reason| KanteiError::invalid_artifact("scaler", reason))?;
        Ok(scaler)
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.mean.is_empty() {
            return Err("mean must not be empty".to_string());
        }
        if self.mean.len() != self.scale.len() {
            return Err(format!(
                "mean length {} != scale length {}",
                self.mean.len(),
                self.scale.len()
            ));
        }
        if self.mean.iter().any(|v| !v.is_finite()) {
            return Err("mean must be finite".to_string());
        }
        // Zero-variance columns are exported with scale 1.0, never 0.
        if self.scale.iter().any(|v| !v.is_finite() || *v == 0.0) {
            return Err("scale must be finite and non-zero".to_string());
        }
        Ok(())
    }

    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    pub fn transform(&self, raw: &[f64]) -> Result<Vec<f64>> {
        if raw.len() != self.dim() {
            return Err(KanteiError::PredictionFailure(format!(
                "scaler input dim mismatch: got {}, expected {}",
                raw.len(),
                self.dim()
            )));
        }

        Ok(raw
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect())
    }
}

//! Linear regression inference (CPU-only).
//!
//! Loads the intercept/coefficient pair exported by the training pipeline
//! from JSON. Shapes are validated on load so `predict` only has to check
//! the input length.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{KanteiError, Result};

fn default_model_type() -> String {
    "LinearRegression".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    /// Estimator name reported by readiness probes.
    #[serde(default = "default_model_type")]
    pub model_type: String,
    pub intercept: f64,
    /// One coefficient per schema feature, index-aligned.
    pub coefficients: Vec<f64>,
}

impl LinearModel {
    pub fn new(intercept: f64, coefficients: Vec<f64>) -> Self {
        Self {
            model_type: default_model_type(),
            intercept,
            coefficients,
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        let model: Self = serde_json::from_str(&content)?;
        model
            .validate()
            .map_err(|reason| KanteiError::invalid_artifact("model", reason))?;
        Ok(model)
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.coefficients.is_empty() {
            return Err("coefficients must not be empty".to_string());
        }
        if !self.intercept.is_finite() {
            return Err("intercept must be finite".to_string());
        }
        if let Some(idx) = self.coefficients.iter().position(|c| !c.is_finite()) {
            return Err(format!("coefficient[{idx}] is not finite"));
        }
        Ok(())
    }

    pub fn input_dim(&self) -> usize {
        self.coefficients.len()
    }

    pub fn predict(&self, input: &[f64]) -> Result<f64> {
        if input.len() != self.input_dim() {
            return Err(KanteiError::PredictionFailure(format!(
                "model input dim mismatch: got {}, expected {}",
                input.len(),
                self.input_dim()
            )));
        }

        let score = self
            .coefficients
            .iter()
            .zip(input)
            .fold(self.intercept, |acc, (w, x)| acc + w * x);
        Ok(score)
    }

    /// Per-feature `coef * x` terms; their sum plus the intercept is the score.
    pub fn contributions(&self, input: &[f64]) -> Result<Vec<f64>> {
        if input.len() != self.input_dim() {
            return Err(KanteiError::PredictionFailure(format!(
                "model input dim mismatch: got {}, expected {}",
                input.len(),
                self.input_dim()
            )));
        }
        Ok(self
            .coefficients
            .iter()
            .zip(input)
            .map(|(w, x)| w * x)
            .collect())
    }
}

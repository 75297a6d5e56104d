use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, error, info, warn};

use super::features::build_features;
use super::loader::load_artifacts;
use crate::domain::{BatchPredictResponse, PredictionRequest, PredictionResult};
use crate::error::{KanteiError, Result};
use crate::ml::{FeatureSchema, LinearModel, StandardScaler};

pub const CONFIDENCE_FLOOR: f64 = 0.70;
pub const CONFIDENCE_SPAN: f64 = 0.25;
pub const CONFIDENCE_CAP: f64 = 0.95;

/// Number of feature names echoed by readiness probes.
const MODEL_INFO_FEATURES: usize = 10;

fn round_to(x: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (x * factor).round() / factor
}

/// Coverage heuristic, not a calibrated probability: more populated schema
/// columns means a higher score, bounded to [0.70, 0.95].
pub fn confidence(raw: &[f64]) -> f64 {
    if raw.is_empty() {
        return CONFIDENCE_FLOOR;
    }
    let non_zero = raw.iter().filter(|v| **v != 0.0).count();
    let completeness = non_zero as f64 / raw.len() as f64;
    round_to(
        (CONFIDENCE_FLOOR + completeness * CONFIDENCE_SPAN).min(CONFIDENCE_CAP),
        3,
    )
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub status: String,
    pub model_type: String,
    pub feature_count: usize,
    pub features: Vec<String>,
    pub scaler_type: String,
}

/// Loaded model, scaler and schema. Only constructed once all three are
/// mutually consistent; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Predictor {
    model: LinearModel,
    scaler: StandardScaler,
    schema: FeatureSchema,
}

impl Predictor {
    pub fn new(model: LinearModel, scaler: StandardScaler, schema: FeatureSchema) -> Result<Self> {
        let n = schema.len();
        if model.input_dim() != n {
            return Err(KanteiError::invalid_artifact(
                "model",
                format!("{} coefficients for {n} feature columns", model.input_dim()),
            ));
        }
        if scaler.dim() != n {
            return Err(KanteiError::invalid_artifact(
                "scaler",
                format!("{} mean/scale entries for {n} feature columns", scaler.dim()),
            ));
        }
        Ok(Self {
            model,
            scaler,
            schema,
        })
    }

    pub fn model(&self) -> &LinearModel {
        &self.model
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn features(&self, req: &PredictionRequest) -> Vec<f64> {
        build_features(&self.schema, req)
    }

    pub fn predict(&self, req: &PredictionRequest) -> Result<PredictionResult> {
        let raw = self.features(req);
        self.predict_row(&raw)
    }

    /// Score an already-built raw (unscaled) feature row.
    pub fn predict_row(&self, raw: &[f64]) -> Result<PredictionResult> {
        let scaled = self.scaler.transform(raw)?;
        let score = self.model.predict(&scaled)?;
        if !score.is_finite() {
            return Err(KanteiError::PredictionFailure(format!(
                "model produced non-finite score {score}"
            )));
        }

        // Negative estimates are reported by magnitude.
        let predicted_price = round_to(score.abs(), 1);

        let features_used: BTreeMap<String, f64> = self
            .schema
            .feature_names()
            .iter()
            .zip(raw)
            .filter(|(_, v)| **v != 0.0)
            .map(|(name, v)| (name.clone(), *v))
            .collect();

        debug!(predicted_price, "prediction computed");

        Ok(PredictionResult {
            predicted_price,
            confidence: Some(confidence(raw)),
            features_used: Some(features_used),
        })
    }

    pub fn model_info(&self) -> ModelInfo {
        ModelInfo {
            status: "loaded".to_string(),
            model_type: self.model.model_type.clone(),
            feature_count: self.schema.len(),
            features: self
                .schema
                .feature_names()
                .iter()
                .take(MODEL_INFO_FEATURES)
                .cloned()
                .collect(),
            scaler_type: self.scaler.scaler_type.clone(),
        }
    }
}

/// Readiness snapshot for health probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Readiness {
    pub model_loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_info: Option<ModelInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_error: Option<String>,
}

/// Serving front for the predictor. Either fully ready or not at all.
#[derive(Debug)]
pub struct PredictionService {
    predictor: Option<Predictor>,
    load_error: Option<String>,
}

impl PredictionService {
    pub fn ready(predictor: Predictor) -> Self {
        Self {
            predictor: Some(predictor),
            load_error: None,
        }
    }

    pub fn unready(reason: impl Into<String>) -> Self {
        Self {
            predictor: None,
            load_error: Some(reason.into()),
        }
    }

    /// Load artifacts from `dir`. A failed load yields an unready service
    /// instead of an error so the process can still answer health probes.
    pub fn load<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        match load_artifacts(dir) {
            Ok(predictor) => {
                info!(
                    dir = %dir.display(),
                    feature_count = predictor.schema().len(),
                    "Models loaded successfully"
                );
                Self::ready(predictor)
            }
            Err(e) => {
                error!(dir = %dir.display(), "Failed to load models: {}", e);
                Self::unready(e.to_string())
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        self.predictor.is_some()
    }

    pub fn predictor(&self) -> Result<&Predictor> {
        self.predictor.as_ref().ok_or(KanteiError::NotReady)
    }

    pub fn readiness(&self) -> Readiness {
        Readiness {
            model_loaded: self.is_ready(),
            model_info: self.predictor.as_ref().map(Predictor::model_info),
            load_error: self.load_error.clone(),
        }
    }

    pub fn predict(&self, req: &PredictionRequest) -> Result<PredictionResult> {
        self.predictor()?.predict(req)
    }

    /// Predict each item independently. Item failures are recorded by index
    /// and never abort the batch.
    pub fn predict_batch(
        &self,
        items: &[serde_json::Value],
        max_size: usize,
    ) -> Result<BatchPredictResponse> {
        let predictor = self.predictor()?;
        if items.len() > max_size {
            return Err(KanteiError::InvalidInput(format!(
                "Too many requests. Maximum {max_size} requests per batch."
            )));
        }

        let mut out = BatchPredictResponse::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match PredictionRequest::from_json(item).and_then(|req| predictor.predict(&req)) {
                Ok(result) => out.push_ok(result),
                Err(e) => {
                    warn!(index, "batch item failed: {}", e);
                    out.push_err(e.to_string(), item.clone());
                }
            }
        }
        Ok(out)
    }
}

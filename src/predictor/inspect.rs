//! Model explainability: coefficient rankings and per-feature contributions.

use serde::Serialize;

use super::service::Predictor;
use crate::domain::PredictionRequest;
use crate::error::Result;

const SCALER_PREVIEW: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct Coefficient {
    pub feature: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelReport {
    pub model_type: String,
    pub intercept: f64,
    pub feature_count: usize,
    /// Largest coefficients by absolute value.
    pub top_coefficients: Vec<Coefficient>,
    /// Coefficients of the `ward_*` one-hot columns, keyed by ward name.
    pub ward_coefficients: Vec<Coefficient>,
    pub scaler_type: String,
    pub scaler_mean: Vec<f64>,
    pub scaler_scale: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Contribution {
    pub feature: String,
    pub raw: f64,
    pub scaled: f64,
    pub coefficient: f64,
    pub contribution: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionBreakdown {
    pub intercept: f64,
    /// Non-zero terms, largest magnitude first.
    pub contributions: Vec<Contribution>,
    /// Unrounded model score; equals intercept plus all contributions.
    pub score: f64,
}

impl Predictor {
    pub fn report(&self, top: usize) -> ModelReport {
        let names = self.schema().feature_names();
        let coefs = &self.model().coefficients;

        let mut ranked: Vec<Coefficient> = names
            .iter()
            .zip(coefs)
            .map(|(feature, value)| Coefficient {
                feature: feature.clone(),
                value: *value,
            })
            .collect();
        ranked.sort_by(|a, b| b.value.abs().total_cmp(&a.value.abs()));
        ranked.truncate(top);

        let ward_coefficients = names
            .iter()
            .zip(coefs)
            .filter_map(|(feature, value)| {
                feature.strip_prefix("ward_").map(|ward| Coefficient {
                    feature: ward.to_string(),
                    value: *value,
                })
            })
            .collect();

        let scaler = self.scaler();
        ModelReport {
            model_type: self.model().model_type.clone(),
            intercept: self.model().intercept,
            feature_count: names.len(),
            top_coefficients: ranked,
            ward_coefficients,
            scaler_type: scaler.scaler_type.clone(),
            scaler_mean: scaler.mean.iter().take(SCALER_PREVIEW).copied().collect(),
            scaler_scale: scaler.scale.iter().take(SCALER_PREVIEW).copied().collect(),
        }
    }

    pub fn breakdown(&self, req: &PredictionRequest) -> Result<PredictionBreakdown> {
        let raw = self.features(req);
        let scaled = self.scaler().transform(&raw)?;
        let parts = self.model().contributions(&scaled)?;
        let score = self.model().predict(&scaled)?;

        let mut contributions: Vec<Contribution> = self
            .schema()
            .feature_names()
            .iter()
            .enumerate()
            .filter(|(i, _)| parts[*i] != 0.0)
            .map(|(i, feature)| Contribution {
                feature: feature.clone(),
                raw: raw[i],
                scaled: scaled[i],
                coefficient: self.model().coefficients[i],
                contribution: parts[i],
            })
            .collect();
        contributions.sort_by(|a, b| b.contribution.abs().total_cmp(&a.contribution.abs()));

        Ok(PredictionBreakdown {
            intercept: self.model().intercept,
            contributions,
            score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Ward;
    use crate::ml::{FeatureSchema, LinearModel, StandardScaler};
    use std::collections::BTreeMap;

    fn predictor() -> Predictor {
        let cols = vec![
            "building_area".to_string(),
            "land_area".to_string(),
            "ward_港区".to_string(),
            "ward_足立区".to_string(),
        ];
        Predictor::new(
            LinearModel::new(5000.0, vec![300.0, -20.0, 1500.0, -700.0]),
            StandardScaler::new(vec![80.0, 100.0, 0.1, 0.1], vec![20.0, 50.0, 0.3, 0.3]),
            FeatureSchema::new(cols, BTreeMap::new(), "price".into()).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn report_ranks_by_magnitude_and_lists_wards() {
        let report = predictor().report(2);
        let top: Vec<&str> = report
            .top_coefficients
            .iter()
            .map(|c| c.feature.as_str())
            .collect();
        assert_eq!(top, vec!["ward_港区", "ward_足立区"]);

        let wards: Vec<&str> = report
            .ward_coefficients
            .iter()
            .map(|c| c.feature.as_str())
            .collect();
        assert_eq!(wards, vec!["港区", "足立区"]);
        assert_eq!(report.scaler_mean.len(), 4);
    }

    #[test]
    fn breakdown_sums_to_score() {
        let p = predictor();
        let req = PredictionRequest {
            land_area: 120.0,
            building_area: 80.0,
            building_age: 10.0,
            ward: Ward::Minato,
            district: None,
            year: 2024,
            quarter: 1,
        };
        let b = p.breakdown(&req).unwrap();
        let total: f64 = b.intercept + b.contributions.iter().map(|c| c.contribution).sum::<f64>();
        assert!((total - b.score).abs() < 1e-9);
        assert!(b.contributions.iter().all(|c| c.contribution != 0.0));
        // building_area sits exactly at its mean, so it contributes nothing.
        assert!(b.contributions.iter().all(|c| c.feature != "building_area"));
    }
}

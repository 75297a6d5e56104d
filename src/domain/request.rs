use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use super::Ward;
use crate::error::{KanteiError, Result};

pub const DEFAULT_YEAR: i64 = 2024;
pub const DEFAULT_QUARTER: i64 = 1;
pub const YEAR_RANGE: (i64, i64) = (2020, 2030);
pub const MAX_BUILDING_AGE: f64 = 100.0;

/// Prediction request as it arrives on the wire, before range checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictRequestBody {
    /// 土地面積 (㎡)
    pub land_area: f64,
    /// 建物面積 (㎡)
    pub building_area: f64,
    /// 築年数 (years)
    pub building_age: f64,
    pub ward_name: String,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default, deserialize_with = "integral")]
    pub year: Option<i64>,
    #[serde(default, deserialize_with = "integral")]
    pub quarter: Option<i64>,
}

/// Accepts `2024` and `2024.0` alike; `2024.5` is rejected.
fn integral<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<f64>::deserialize(deserializer)? {
        None => Ok(None),
        Some(v) if v.is_finite() && v.fract() == 0.0 && v.abs() <= i64::MAX as f64 => {
            Ok(Some(v as i64))
        }
        Some(v) => Err(serde::de::Error::custom(format!(
            "expected an integer, got {v}"
        ))),
    }
}

/// Validated request. Only values that passed range and enum checks reach
/// the feature adapter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRequest {
    pub land_area: f64,
    pub building_area: f64,
    pub building_age: f64,
    pub ward: Ward,
    pub district: Option<String>,
    pub year: i64,
    pub quarter: i64,
}

impl PredictionRequest {
    /// Decode and validate a loosely-typed JSON value.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let body: PredictRequestBody = serde_json::from_value(value.clone())
            .map_err(|e| KanteiError::InvalidInput(e.to_string()))?;
        Self::try_from(body)
    }
}

impl TryFrom<PredictRequestBody> for PredictionRequest {
    type Error = KanteiError;

    fn try_from(body: PredictRequestBody) -> Result<Self> {
        let invalid = |msg: String| Err(KanteiError::InvalidInput(msg));

        if !(body.land_area.is_finite() && body.land_area > 0.0) {
            return invalid(format!("land_area must be > 0, got {}", body.land_area));
        }
        if !(body.building_area.is_finite() && body.building_area > 0.0) {
            return invalid(format!(
                "building_area must be > 0, got {}",
                body.building_area
            ));
        }
        if !(0.0..=MAX_BUILDING_AGE).contains(&body.building_age) {
            return invalid(format!(
                "building_age must be between 0 and {MAX_BUILDING_AGE}, got {}",
                body.building_age
            ));
        }

        let ward: Ward = body.ward_name.parse().map_err(KanteiError::InvalidInput)?;

        let year = body.year.unwrap_or(DEFAULT_YEAR);
        if !(YEAR_RANGE.0..=YEAR_RANGE.1).contains(&year) {
            return invalid(format!(
                "year must be between {} and {}, got {year}",
                YEAR_RANGE.0, YEAR_RANGE.1
            ));
        }
        let quarter = body.quarter.unwrap_or(DEFAULT_QUARTER);
        if !(1..=4).contains(&quarter) {
            return invalid(format!("quarter must be between 1 and 4, got {quarter}"));
        }

        let district = match body.district {
            Some(d) if !d.is_empty() => Some(d),
            _ => Some(ward.default_district()),
        };

        Ok(Self {
            land_area: body.land_area,
            building_area: body.building_area,
            building_age: body.building_age,
            ward,
            district,
            year,
            quarter,
        })
    }
}

/// Outcome of a single prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// 予測価格 (万円)
    pub predicted_price: f64,
    pub confidence: Option<f64>,
    pub features_used: Option<BTreeMap<String, f64>>,
}

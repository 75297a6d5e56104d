//! Request -> feature row mapping.
//!
//! The row's length and per-index meaning come entirely from the schema.
//! Values the schema has no column for are dropped; columns the request
//! cannot fill stay at zero.

use tracing::debug;

use crate::domain::PredictionRequest;
use crate::ml::FeatureSchema;

/// Guards the area ratio against a zero land area.
pub const AREA_RATIO_EPS: f64 = 1e-6;

pub const AREA_RATIO: &str = "area_ratio";
pub const DISTRICT_ENCODED: &str = "district_encoded";
pub const DISTRICT_ENCODER: &str = "district";

/// Build the single feature row for `req`, index-aligned to `schema`.
pub fn build_features(schema: &FeatureSchema, req: &PredictionRequest) -> Vec<f64> {
    let mut row = vec![0.0; schema.len()];

    let mut numeric: Vec<(&str, f64)> = vec![
        ("building_area", req.building_area),
        ("land_area", req.land_area),
        ("building_age", req.building_age),
        ("year", req.year as f64),
        ("quarter", req.quarter as f64),
    ];

    if schema.contains(AREA_RATIO) {
        numeric.push((
            AREA_RATIO,
            req.building_area / (req.land_area + AREA_RATIO_EPS),
        ));
    }

    if let Some(district) = req.district.as_deref().filter(|d| !d.is_empty()) {
        if schema.contains(DISTRICT_ENCODED) {
            numeric.push((DISTRICT_ENCODED, encode_district(schema, district) as f64));
        }
    }

    if let Some(idx) = schema.index_of(&req.ward.feature_column()) {
        row[idx] = 1.0;
    }

    for (name, value) in numeric {
        if let Some(idx) = schema.index_of(name) {
            row[idx] = value;
        }
    }

    row
}

/// Unseen districts (or a schema without a district encoder) map to code 0.
fn encode_district(schema: &FeatureSchema, district: &str) -> usize {
    let Some(encoder) = schema.encoder(DISTRICT_ENCODER) else {
        debug!("no district encoder in schema, using code 0");
        return 0;
    };
    encoder.transform(district).unwrap_or_else(|| {
        debug!(district, "unseen district, using code 0");
        0
    })
}

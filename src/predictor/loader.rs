use std::path::{Path, PathBuf};
use tracing::debug;

use super::service::Predictor;
use crate::error::{KanteiError, Result};
use crate::ml::{FeatureSchema, LinearModel, StandardScaler};

pub const MODEL_FILE: &str = "model.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const FEATURE_INFO_FILE: &str = "feature_info.json";

/// Paths of the three artifacts inside a model directory.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub scaler: PathBuf,
    pub feature_info: PathBuf,
}

impl ArtifactPaths {
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            model: dir.join(MODEL_FILE),
            scaler: dir.join(SCALER_FILE),
            feature_info: dir.join(FEATURE_INFO_FILE),
        }
    }

    pub fn missing(&self) -> Vec<PathBuf> {
        [&self.model, &self.scaler, &self.feature_info]
            .into_iter()
            .filter(|p| !p.exists())
            .cloned()
            .collect()
    }
}

/// Attribute a parse or validation failure to the file it came from.
fn relabel(file: &'static str) -> impl Fn(KanteiError) -> KanteiError {
    move |e| match e {
        KanteiError::InvalidArtifact { reason, .. } => KanteiError::invalid_artifact(file, reason),
        other => KanteiError::invalid_artifact(file, other.to_string()),
    }
}

/// Load model, scaler and schema from `dir`. Nothing is returned unless all
/// three parse, validate and agree on the feature count.
pub fn load_artifacts<P: AsRef<Path>>(dir: P) -> Result<Predictor> {
    let paths = ArtifactPaths::in_dir(dir);

    let missing = paths.missing();
    if !missing.is_empty() {
        return Err(KanteiError::ArtifactMissing(missing));
    }

    let model = LinearModel::from_file(&paths.model).map_err(relabel(MODEL_FILE))?;
    let scaler = StandardScaler::from_file(&paths.scaler).map_err(relabel(SCALER_FILE))?;
    let schema =
        FeatureSchema::from_file(&paths.feature_info).map_err(relabel(FEATURE_INFO_FILE))?;
    debug!(
        features = schema.len(),
        target_column = schema.target_column(),
        "artifacts parsed"
    );

    Predictor::new(model, scaler, schema)
}

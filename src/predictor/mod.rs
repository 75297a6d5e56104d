//! Price prediction core: feature adapter, artifact loader and the
//! immutable predictor shared by request handlers.

pub mod features;
pub mod inspect;
pub mod loader;
pub mod service;

pub use features::build_features;
pub use inspect::{Coefficient, Contribution, ModelReport, PredictionBreakdown};
pub use loader::{load_artifacts, ArtifactPaths, FEATURE_INFO_FILE, MODEL_FILE, SCALER_FILE};
pub use service::{confidence, ModelInfo, PredictionService, Predictor, Readiness};

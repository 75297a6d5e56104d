use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the appraisal service
#[derive(Error, Debug)]
pub enum KanteiError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Artifact loading errors
    #[error("Missing model files: {}", display_paths(.0))]
    ArtifactMissing(Vec<PathBuf>),

    #[error("Invalid artifact {artifact}: {reason}")]
    InvalidArtifact { artifact: String, reason: String },

    // Serving errors
    #[error("Models not loaded")]
    NotReady,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Prediction failed: {0}")]
    PredictionFailure(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl KanteiError {
    pub fn invalid_artifact(artifact: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArtifact {
            artifact: artifact.into(),
            reason: reason.into(),
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias for KanteiError
pub type Result<T> = std::result::Result<T, KanteiError>;

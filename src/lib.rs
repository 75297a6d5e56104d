pub mod adapters;
pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod ml;
pub mod predictor;

pub use config::AppConfig;
pub use domain::{PredictionRequest, PredictionResult, Ward};
pub use error::{KanteiError, Result};
pub use predictor::{PredictionService, Predictor};

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::predictor::PredictionService;

/// Shared application state for API handlers
#[derive(Clone)]
pub struct AppState {
    /// Loaded once at startup, read-only afterwards
    pub service: Arc<PredictionService>,

    /// Maximum items accepted by the batch endpoint
    pub batch_max_size: usize,

    /// Application start time
    pub start_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(service: PredictionService, batch_max_size: usize) -> Self {
        Self {
            service: Arc::new(service),
            batch_max_size,
            start_time: Utc::now(),
        }
    }

    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.start_time).num_seconds()
    }
}

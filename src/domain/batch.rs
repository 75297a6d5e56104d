use serde::{Deserialize, Serialize};

use super::PredictionResult;

/// Per-item failure inside a batch, tagged with the item's position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItemError {
    pub index: usize,
    pub error: String,
    pub input: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchPredictResponse {
    /// One slot per input item, `None` where the item failed.
    pub results: Vec<Option<PredictionResult>>,
    pub errors: Vec<BatchItemError>,
    pub total_processed: usize,
    pub successful: usize,
    pub failed: usize,
}

impl BatchPredictResponse {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            results: Vec::with_capacity(n),
            errors: Vec::new(),
            total_processed: 0,
            successful: 0,
            failed: 0,
        }
    }

    pub fn push_ok(&mut self, result: PredictionResult) {
        self.results.push(Some(result));
        self.total_processed += 1;
        self.successful += 1;
    }

    pub fn push_err(&mut self, error: String, input: serde_json::Value) {
        self.errors.push(BatchItemError {
            index: self.results.len(),
            error,
            input,
        });
        self.results.push(None);
        self.total_processed += 1;
        self.failed += 1;
    }
}

//! Lightweight ML utilities (deploy-safe inference).
//!
//! Artifacts are plain JSON exported by the training pipeline, so the
//! service needs no native numeric toolchain.

pub mod linear;
pub mod scaler;
pub mod schema;

pub use linear::LinearModel;
pub use scaler::StandardScaler;
pub use schema::{FeatureSchema, LabelEncoder};

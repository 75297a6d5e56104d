//! Training-time feature schema: ordered column names plus fitted encoders.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::error::{KanteiError, Result};

fn default_target_column() -> String {
    "price".to_string()
}

/// Fitted label encoder. A label's code is its position in `classes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "LabelEncoderFile", into = "LabelEncoderFile")]
pub struct LabelEncoder {
    classes: Vec<String>,
    codes: HashMap<String, usize>,
}

/// On-disk form of [`LabelEncoder`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncoderFile {
    classes: Vec<String>,
}

impl TryFrom<LabelEncoderFile> for LabelEncoder {
    type Error = String;

    fn try_from(file: LabelEncoderFile) -> std::result::Result<Self, Self::Error> {
        Self::new(file.classes)
    }
}

impl From<LabelEncoder> for LabelEncoderFile {
    fn from(encoder: LabelEncoder) -> Self {
        Self {
            classes: encoder.classes,
        }
    }
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> std::result::Result<Self, String> {
        let mut codes = HashMap::with_capacity(classes.len());
        for (code, label) in classes.iter().enumerate() {
            if codes.insert(label.clone(), code).is_some() {
                return Err(format!("duplicate encoder class {label:?}"));
            }
        }
        Ok(Self { classes, codes })
    }

    /// `None` for labels the encoder was never fitted on.
    pub fn transform(&self, label: &str) -> Option<usize> {
        self.codes.get(label).copied()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

/// Ordered feature names with a precomputed name -> index lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "FeatureInfoFile", into = "FeatureInfoFile")]
pub struct FeatureSchema {
    feature_columns: Vec<String>,
    label_encoders: BTreeMap<String, LabelEncoder>,
    target_column: String,
    index: HashMap<String, usize>,
}

/// On-disk form of [`FeatureSchema`] (`feature_info.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureInfoFile {
    feature_columns: Vec<String>,
    #[serde(default)]
    label_encoders: BTreeMap<String, LabelEncoder>,
    #[serde(default = "default_target_column")]
    target_column: String,
}

impl TryFrom<FeatureInfoFile> for FeatureSchema {
    type Error = String;

    fn try_from(file: FeatureInfoFile) -> std::result::Result<Self, Self::Error> {
        Self::new(file.feature_columns, file.label_encoders, file.target_column)
    }
}

impl From<FeatureSchema> for FeatureInfoFile {
    fn from(schema: FeatureSchema) -> Self {
        Self {
            feature_columns: schema.feature_columns,
            label_encoders: schema.label_encoders,
            target_column: schema.target_column,
        }
    }
}

impl FeatureSchema {
    pub fn new(
        feature_columns: Vec<String>,
        label_encoders: BTreeMap<String, LabelEncoder>,
        target_column: String,
    ) -> std::result::Result<Self, String> {
        if feature_columns.is_empty() {
            return Err("feature_columns must not be empty".to_string());
        }

        let mut index = HashMap::with_capacity(feature_columns.len());
        for (i, name) in feature_columns.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(format!("duplicate feature column {name:?}"));
            }
        }

        Ok(Self {
            feature_columns,
            label_encoders,
            target_column,
            index,
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        serde_json::from_str(&content)
            .map_err(|e| KanteiError::invalid_artifact("feature_info", e.to_string()))
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_columns
    }

    pub fn len(&self) -> usize {
        self.feature_columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feature_columns.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn encoder(&self, field: &str) -> Option<&LabelEncoder> {
        self.label_encoders.get(field)
    }

    pub fn target_column(&self) -> &str {
        &self.target_column
    }
}

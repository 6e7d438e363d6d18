//! Label encoders for categorical form fields

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::read_json;
use crate::{Result, TennisError};

/// Maps category labels to their index in a fixed class list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Self {
        LabelEncoder { classes }
    }

    /// Known labels in code order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Code for an exactly matching label
    pub fn transform(&self, label: &str) -> Option<usize> {
        self.classes.iter().position(|c| c == label)
    }
}

/// One encoder per categorical field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncoderBundle {
    encoders: BTreeMap<String, LabelEncoder>,
}

impl EncoderBundle {
    pub fn new(encoders: BTreeMap<String, LabelEncoder>) -> Self {
        EncoderBundle { encoders }
    }

    /// Read and validate an encoder bundle on its own
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bundle: EncoderBundle = read_json(path)?;
        bundle.validate()?;
        Ok(bundle)
    }

    pub fn get(&self, field: &str) -> Option<&LabelEncoder> {
        self.encoders.get(field)
    }

    /// A field is categorical exactly when it has an encoder
    pub fn is_categorical(&self, field: &str) -> bool {
        self.encoders.contains_key(field)
    }

    /// Encode a label for a categorical field
    pub fn encode(&self, field: &str, label: &str) -> Result<usize> {
        let unknown = || TennisError::UnknownCategory {
            field: field.to_string(),
            value: label.to_string(),
        };
        self.get(field).ok_or_else(unknown)?.transform(label).ok_or_else(unknown)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.encoders.keys().map(String::as_str)
    }

    /// Reject empty class lists and duplicate labels
    pub fn validate(&self) -> Result<()> {
        for (field, encoder) in &self.encoders {
            if encoder.classes.is_empty() {
                return Err(TennisError::Config(format!(
                    "Encoder for {} has no classes",
                    field
                )));
            }
            for (i, class) in encoder.classes.iter().enumerate() {
                if encoder.classes[..i].contains(class) {
                    return Err(TennisError::Config(format!(
                        "Encoder for {} lists {:?} twice",
                        field, class
                    )));
                }
            }
        }
        Ok(())
    }
}

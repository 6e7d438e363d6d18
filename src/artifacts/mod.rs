//! Persisted artifacts produced alongside the trained model
//!
//! Scalers, encoders and the ordered feature-name lists are read once at
//! startup and stay read-only afterwards.

pub mod encoder;
pub mod scaler;

pub use encoder::{EncoderBundle, LabelEncoder};
pub use scaler::{Scaler, ScalerBundle};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{ArtifactsConfig, Result, TennisError};

/// Feature names in model input and output order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureNames {
    pub input_features: Vec<String>,
    pub output_features: Vec<String>,
}

impl FeatureNames {
    pub fn input_dim(&self) -> usize {
        self.input_features.len()
    }

    pub fn output_dim(&self) -> usize {
        self.output_features.len()
    }

    pub fn validate(&self) -> Result<()> {
        if self.input_features.is_empty() {
            return Err(TennisError::Config("No input features listed".to_string()));
        }
        if self.output_features.len() < 2 {
            return Err(TennisError::ShapeMismatch {
                what: "output features".to_string(),
                expected: 2,
                actual: self.output_features.len(),
            });
        }
        for (i, name) in self.input_features.iter().enumerate() {
            if self.input_features[..i].contains(name) {
                return Err(TennisError::Config(format!(
                    "Input feature {} listed twice",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// Everything besides the model weights needed to run a prediction
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub scalers: ScalerBundle,
    pub encoders: EncoderBundle,
    pub features: FeatureNames,
}

impl Artifacts {
    /// Check that the pieces agree with each other
    pub fn new(scalers: ScalerBundle, encoders: EncoderBundle, features: FeatureNames) -> Result<Self> {
        features.validate()?;
        encoders.validate()?;
        scalers.input_scaler.validate()?;
        scalers.output_scaler.validate()?;

        if scalers.input_scaler.dim() != features.input_dim() {
            return Err(TennisError::ShapeMismatch {
                what: "input scaler".to_string(),
                expected: features.input_dim(),
                actual: scalers.input_scaler.dim(),
            });
        }
        if scalers.output_scaler.dim() != features.output_dim() {
            return Err(TennisError::ShapeMismatch {
                what: "output scaler".to_string(),
                expected: features.output_dim(),
                actual: scalers.output_scaler.dim(),
            });
        }

        Ok(Artifacts {
            scalers,
            encoders,
            features,
        })
    }

    /// Load the scaler, encoder and feature-name bundles
    pub fn load(config: &ArtifactsConfig) -> Result<Self> {
        let scalers: ScalerBundle = read_json(&config.scalers_path)?;
        let encoders: EncoderBundle = read_json(&config.encoders_path)?;
        let features: FeatureNames = read_json(&config.features_path)?;

        log::debug!(
            "Loaded {} input features, {} output features, {} encoders",
            features.input_dim(),
            features.output_dim(),
            encoders.fields().count()
        );

        Self::new(scalers, encoders, features)
    }
}

/// Read one JSON artifact, tagging failures with its path
pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let artifact_error = |message: String| TennisError::Artifact {
        path: path.display().to_string(),
        message,
    };

    let content = std::fs::read_to_string(path).map_err(|e| artifact_error(e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| artifact_error(e.to_string()))
}

/// Write one JSON artifact
pub fn write_json<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn names(inputs: &[&str], outputs: &[&str]) -> FeatureNames {
        FeatureNames {
            input_features: inputs.iter().map(|s| s.to_string()).collect(),
            output_features: outputs.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn identity(dim: usize) -> Scaler {
        Scaler::Standard {
            mean: vec![0.0; dim],
            scale: vec![1.0; dim],
        }
    }

    #[test]
    fn test_feature_names_validation() {
        assert!(names(&["a", "b"], &["x", "y"]).validate().is_ok());
        assert!(names(&[], &["x", "y"]).validate().is_err());
        assert!(names(&["a"], &["x"]).validate().is_err());
        assert!(names(&["a", "a"], &["x", "y"]).validate().is_err());
    }

    #[test]
    fn test_scaler_width_must_match_features() {
        let scalers = ScalerBundle {
            input_scaler: identity(3),
            output_scaler: identity(2),
        };
        let err = Artifacts::new(scalers, EncoderBundle::default(), names(&["a", "b"], &["x", "y"]))
            .unwrap_err();
        assert!(matches!(
            err,
            TennisError::ShapeMismatch {
                expected: 2,
                actual: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let config = ArtifactsConfig {
            model_path: dir.path().join("model").display().to_string(),
            scalers_path: dir.path().join("scalers.json").display().to_string(),
            encoders_path: dir.path().join("encoders.json").display().to_string(),
            features_path: dir.path().join("features.json").display().to_string(),
        };

        let scalers = ScalerBundle {
            input_scaler: identity(2),
            output_scaler: identity(2),
        };
        let mut encoders = BTreeMap::new();
        encoders.insert("a".to_string(), LabelEncoder::new(vec!["x".into(), "y".into()]));

        write_json(&config.scalers_path, &scalers).unwrap();
        write_json(&config.encoders_path, &EncoderBundle::new(encoders)).unwrap();
        write_json(&config.features_path, &names(&["a", "b"], &["B365_P1", "B365_P2"])).unwrap();

        let artifacts = Artifacts::load(&config).unwrap();
        assert_eq!(artifacts.features.input_dim(), 2);
        assert_eq!(artifacts.encoders.encode("a", "y").unwrap(), 1);
    }

    #[test]
    fn test_missing_artifact_is_reported_with_path() {
        let err = read_json::<FeatureNames>("nowhere/features.json").unwrap_err();
        match err {
            TennisError::Artifact { path, .. } => assert!(path.contains("features.json")),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_malformed_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("features.json");
        std::fs::write(&path, "{\"input_features\": 3}").unwrap();
        assert!(matches!(
            read_json::<FeatureNames>(&path),
            Err(TennisError::Artifact { .. })
        ));
    }
}

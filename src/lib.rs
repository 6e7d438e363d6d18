//! Tennis match odds prediction
//!
//! Loads a pre-trained regression model together with its fitted scalers and
//! category encoders, derives engineered features from the match attributes
//! and predicts the bookmaker odds for both players.

pub mod artifacts;
pub mod features;
pub mod form;
pub mod model;
pub mod predict;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Qualitative read of the ratio between the two predicted odds.
///
/// Serialized as its description text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ConfidenceLevel {
    /// First odds clearly above the second
    Winner,
    /// First odds clearly below the second
    Loser,
    /// Neither side stands out
    Close,
}

impl ConfidenceLevel {
    /// Ratios strictly above this favour the first value
    pub const WINNER_THRESHOLD: f64 = 1.5;
    /// Ratios strictly below this favour the second value
    pub const LOSER_THRESHOLD: f64 = 0.67;

    /// Classify a first/second odds ratio.
    ///
    /// `[0.67, 1.5]` is "close"; a NaN ratio is also "close".
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio > Self::WINNER_THRESHOLD {
            ConfidenceLevel::Winner
        } else if ratio < Self::LOSER_THRESHOLD {
            ConfidenceLevel::Loser
        } else {
            ConfidenceLevel::Close
        }
    }

    /// Classify a pair of predicted odds
    pub fn from_odds(first: f64, second: f64) -> Self {
        Self::from_ratio(first / second)
    }

    pub fn description(&self) -> &'static str {
        match self {
            ConfidenceLevel::Winner => "High confidence in winner prediction",
            ConfidenceLevel::Loser => "High confidence in loser prediction",
            ConfidenceLevel::Close => "Close match prediction",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl From<ConfidenceLevel> for String {
    fn from(level: ConfidenceLevel) -> Self {
        level.description().to_string()
    }
}

impl TryFrom<String> for ConfidenceLevel {
    type Error = String;

    fn try_from(text: String) -> std::result::Result<Self, Self::Error> {
        [
            ConfidenceLevel::Winner,
            ConfidenceLevel::Loser,
            ConfidenceLevel::Close,
        ]
        .into_iter()
        .find(|level| level.description() == text)
        .ok_or_else(|| format!("Unknown confidence assessment: {}", text))
    }
}

/// Model prediction output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Output feature name of the first value (e.g. `B365_P1`)
    pub win_label: String,
    /// Predicted odds for player 1
    pub win_odds: f64,
    /// Output feature name of the second value (e.g. `B365_P2`)
    pub loss_label: String,
    /// Predicted odds for player 2
    pub loss_odds: f64,
    pub confidence: ConfidenceLevel,
}

impl Prediction {
    pub fn new(win_label: String, win_odds: f64, loss_label: String, loss_odds: f64) -> Self {
        Prediction {
            win_label,
            win_odds,
            loss_label,
            loss_odds,
            confidence: ConfidenceLevel::from_odds(win_odds, loss_odds),
        }
    }

    /// Ratio of the first predicted odds to the second
    pub fn ratio(&self) -> f64 {
        self.win_odds / self.loss_odds
    }
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum TennisError {
    #[error("Invalid numeric value for {field}: {value:?}")]
    InvalidNumber { field: String, value: String },

    #[error("Unknown {field} value: {value:?}")]
    UnknownCategory { field: String, value: String },

    #[error("Missing form field: {0}")]
    MissingField(String),

    #[error("Missing feature: {0}")]
    MissingFeature(String),

    #[error("Shape mismatch in {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    #[error("Failed to load artifact {path}: {message}")]
    Artifact { path: String, message: String },

    #[error("Model not found at {0} - place the trained model artifacts there first")]
    NoModel(String),

    #[error("{name} is not a finite number: {value}")]
    NonFinite { name: String, value: f64 },

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TennisError {
    /// Whether this is a malformed numeric entry rather than any other failure
    pub fn is_input_error(&self) -> bool {
        matches!(self, TennisError::InvalidNumber { .. })
    }

    /// Heading for the message shown to the user
    pub fn title(&self) -> &'static str {
        if self.is_input_error() {
            "Input Error"
        } else {
            "Error"
        }
    }

    /// Message shown to the user when a prediction fails
    pub fn user_message(&self) -> String {
        if self.is_input_error() {
            "Please enter valid numeric values for all fields.".to_string()
        } else {
            self.to_string()
        }
    }
}

pub type Result<T> = std::result::Result<T, TennisError>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub artifacts: ArtifactsConfig,
    pub model: ModelConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactsConfig {
    /// Model record path without the `.mpk` extension
    pub model_path: String,
    pub scalers_path: String,
    pub encoders_path: String,
    pub features_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub hidden_dims: Vec<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            artifacts: ArtifactsConfig {
                model_path: "model/tennis_model".to_string(),
                scalers_path: "model/scalers.json".to_string(),
                encoders_path: "model/encoders.json".to_string(),
                features_path: "model/features.json".to_string(),
            },
            model: ModelConfig {
                hidden_dims: vec![64, 32],
            },
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TennisError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        toml::from_str(&content)
            .map_err(|e| TennisError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TennisError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Model record file as written by burn
    pub fn model_file(&self) -> String {
        format!("{}.mpk", self.artifacts.model_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_close_interval_is_inclusive() {
        assert_eq!(ConfidenceLevel::from_ratio(0.67), ConfidenceLevel::Close);
        assert_eq!(ConfidenceLevel::from_ratio(1.0), ConfidenceLevel::Close);
        assert_eq!(ConfidenceLevel::from_ratio(1.5), ConfidenceLevel::Close);
    }

    #[test]
    fn test_confidence_outside_interval() {
        assert_eq!(ConfidenceLevel::from_ratio(1.5001), ConfidenceLevel::Winner);
        assert_eq!(ConfidenceLevel::from_ratio(0.6699), ConfidenceLevel::Loser);
        assert_eq!(ConfidenceLevel::from_ratio(f64::INFINITY), ConfidenceLevel::Winner);
        assert_eq!(ConfidenceLevel::from_ratio(0.0), ConfidenceLevel::Loser);
    }

    #[test]
    fn test_confidence_nan_is_close() {
        assert_eq!(ConfidenceLevel::from_odds(0.0, 0.0), ConfidenceLevel::Close);
    }

    #[test]
    fn test_confidence_descriptions() {
        assert_eq!(
            ConfidenceLevel::Winner.to_string(),
            "High confidence in winner prediction"
        );
        assert_eq!(
            ConfidenceLevel::Loser.to_string(),
            "High confidence in loser prediction"
        );
        assert_eq!(ConfidenceLevel::Close.to_string(), "Close match prediction");
    }

    #[test]
    fn test_prediction_derives_confidence() {
        let pred = Prediction::new("B365_P1".into(), 3.0, "B365_P2".into(), 1.2);
        assert_eq!(pred.confidence, ConfidenceLevel::Winner);
        assert!((pred.ratio() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_prediction_json_uses_description() {
        let pred = Prediction::new("B365_P1".into(), 1.1, "B365_P2".into(), 4.0);
        let json = serde_json::to_value(&pred).unwrap();
        assert_eq!(json["confidence"], "High confidence in loser prediction");

        let back: Prediction = serde_json::from_value(json).unwrap();
        assert_eq!(back.confidence, ConfidenceLevel::Loser);
        assert!(serde_json::from_str::<ConfidenceLevel>("\"Loser\"").is_err());
    }

    #[test]
    fn test_input_error_is_distinct() {
        let number = TennisError::InvalidNumber {
            field: "P1Rank".into(),
            value: "ten".into(),
        };
        let category = TennisError::UnknownCategory {
            field: "Surface".into(),
            value: "Ice".into(),
        };

        assert!(number.is_input_error());
        assert!(!category.is_input_error());
        assert_eq!(number.title(), "Input Error");
        assert_eq!(category.title(), "Error");
        assert_eq!(
            number.user_message(),
            "Please enter valid numeric values for all fields."
        );
        assert!(category.user_message().contains("Ice"));
    }

    #[test]
    fn test_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let path = path.to_str().unwrap();

        let mut config = Config::default();
        config.model.hidden_dims = vec![16];
        config.save(path).unwrap();

        let loaded = Config::load(path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.model_file(), "model/tennis_model.mpk");
    }

    #[test]
    fn test_config_load_missing_file() {
        let err = Config::load("does/not/exist.toml").unwrap_err();
        assert!(matches!(err, TennisError::Config(_)));
    }
}

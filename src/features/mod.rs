//! Feature extraction
//!
//! Holds encoded match attributes and derives the engineered features the
//! model was trained with.

pub mod engineer;
pub mod record;

pub use engineer::{engineer_features, EngineeredFeatures};
pub use record::FeatureRecord;

//! Engineered features derived from the raw match attributes

use super::record::FeatureRecord;
use crate::{Result, TennisError};

/// Derived features, computed from rankings, points, ages and heights
#[derive(Debug, Clone, PartialEq)]
pub struct EngineeredFeatures {
    /// P1 points per (rank + 1)
    pub winner_rank_points_ratio: f64,
    /// P2 points per (rank + 1)
    pub loser_rank_points_ratio: f64,
    pub age_difference: f64,
    pub height_difference: f64,
    /// Positive when P1 is ranked better (lower rank number)
    pub rank_difference: f64,
    pub points_difference: f64,
    pub log_p1_rank: f64,
    pub log_p2_rank: f64,
    pub log_p1_pts: f64,
    pub log_p2_pts: f64,
}

impl EngineeredFeatures {
    /// Raw fields the derivation reads
    pub const INPUTS: [&'static str; 8] = [
        "P1Pts", "P2Pts", "P1Rank", "P2Rank", "P1_age", "P2_age", "P1_ht", "P2_ht",
    ];

    /// Names the derived values are stored under, in `to_vec` order
    pub const NAMES: [&'static str; 10] = [
        "winner_rank_points_ratio",
        "loser_rank_points_ratio",
        "age_difference",
        "height_difference",
        "rank_difference",
        "points_difference",
        "log_P1Rank",
        "log_P2Rank",
        "log_P1Pts",
        "log_P2Pts",
    ];

    /// Derive from a record holding at least [`Self::INPUTS`]
    pub fn from_record(record: &FeatureRecord) -> Result<Self> {
        let p1_pts = record.get("P1Pts")?;
        let p2_pts = record.get("P2Pts")?;
        let p1_rank = record.get("P1Rank")?;
        let p2_rank = record.get("P2Rank")?;
        let p1_age = record.get("P1_age")?;
        let p2_age = record.get("P2_age")?;
        let p1_ht = record.get("P1_ht")?;
        let p2_ht = record.get("P2_ht")?;

        let features = EngineeredFeatures {
            winner_rank_points_ratio: p1_pts / (p1_rank + 1.0),
            loser_rank_points_ratio: p2_pts / (p2_rank + 1.0),
            age_difference: p1_age - p2_age,
            height_difference: p1_ht - p2_ht,
            rank_difference: p2_rank - p1_rank,
            points_difference: p1_pts - p2_pts,
            log_p1_rank: p1_rank.ln_1p(),
            log_p2_rank: p2_rank.ln_1p(),
            log_p1_pts: p1_pts.ln_1p(),
            log_p2_pts: p2_pts.ln_1p(),
        };

        // A rank of -1 zeroes a denominator and a log argument
        for (name, value) in Self::NAMES.iter().zip(features.to_vec()) {
            if !value.is_finite() {
                return Err(TennisError::NonFinite {
                    name: name.to_string(),
                    value,
                });
            }
        }

        Ok(features)
    }

    /// Convert to a flat vector
    pub fn to_vec(&self) -> Vec<f64> {
        vec![
            self.winner_rank_points_ratio,
            self.loser_rank_points_ratio,
            self.age_difference,
            self.height_difference,
            self.rank_difference,
            self.points_difference,
            self.log_p1_rank,
            self.log_p2_rank,
            self.log_p1_pts,
            self.log_p2_pts,
        ]
    }
}

/// Copy of `record` with the engineered features added
pub fn engineer_features(record: &FeatureRecord) -> Result<FeatureRecord> {
    let engineered = EngineeredFeatures::from_record(record)?;
    let mut features = record.clone();
    for (name, value) in EngineeredFeatures::NAMES.iter().zip(engineered.to_vec()) {
        features.insert(*name, value);
    }
    Ok(features)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_record() -> FeatureRecord {
        [
            ("P1Pts", 1000.0),
            ("P1Rank", 10.0),
            ("P2Pts", 500.0),
            ("P2Rank", 50.0),
            ("P1_age", 24.5),
            ("P2_age", 31.0),
            ("P1_ht", 188.0),
            ("P2_ht", 180.0),
            ("minutes", 95.0),
        ]
        .into_iter()
        .collect()
    }

    fn swapped(record: &FeatureRecord) -> FeatureRecord {
        record
            .iter()
            .map(|(name, value)| {
                let name = if name.starts_with("P1") {
                    name.replacen("P1", "P2", 1)
                } else if name.starts_with("P2") {
                    name.replacen("P2", "P1", 1)
                } else {
                    name.to_string()
                };
                (name, value)
            })
            .collect()
    }

    #[test]
    fn test_rank_points_ratios() {
        let f = EngineeredFeatures::from_record(&base_record()).unwrap();
        assert_eq!(f.winner_rank_points_ratio, 1000.0 / 11.0);
        assert_eq!(f.loser_rank_points_ratio, 500.0 / 51.0);
    }

    #[test]
    fn test_differences() {
        let f = EngineeredFeatures::from_record(&base_record()).unwrap();
        assert_eq!(f.age_difference, -6.5);
        assert_eq!(f.height_difference, 8.0);
        assert_eq!(f.rank_difference, 40.0);
        assert_eq!(f.points_difference, 500.0);
    }

    #[test]
    fn test_differences_antisymmetric_under_swap() {
        let record = base_record();
        let f = EngineeredFeatures::from_record(&record).unwrap();
        let g = EngineeredFeatures::from_record(&swapped(&record)).unwrap();

        assert_eq!(g.age_difference, -f.age_difference);
        assert_eq!(g.height_difference, -f.height_difference);
        assert_eq!(g.rank_difference, -f.rank_difference);
        assert_eq!(g.points_difference, -f.points_difference);
    }

    #[test]
    fn test_log_of_zero_is_zero() {
        let mut record = base_record();
        for name in ["P1Rank", "P2Rank", "P1Pts", "P2Pts"] {
            record.insert(name, 0.0);
        }
        let f = EngineeredFeatures::from_record(&record).unwrap();

        assert_eq!(f.log_p1_rank, 0.0);
        assert_eq!(f.log_p2_rank, 0.0);
        assert_eq!(f.log_p1_pts, 0.0);
        assert_eq!(f.log_p2_pts, 0.0);
        // +1 offset keeps the ratios finite at rank zero
        assert_eq!(f.winner_rank_points_ratio, 0.0);
    }

    #[test]
    fn test_log_transform() {
        let f = EngineeredFeatures::from_record(&base_record()).unwrap();
        assert!((f.log_p1_rank - 11.0f64.ln()).abs() < 1e-12);
        assert!((f.log_p2_pts - 501.0f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_engineer_keeps_input_fields() {
        let record = base_record();
        let features = engineer_features(&record).unwrap();

        assert_eq!(
            features.iter().count(),
            record.iter().count() + EngineeredFeatures::NAMES.len()
        );
        assert_eq!(features.get("minutes").unwrap(), 95.0);
        assert_eq!(features.get("log_P1Pts").unwrap(), 1000.0f64.ln_1p());
        for name in EngineeredFeatures::NAMES {
            assert!(features.contains(name), "missing {}", name);
        }
    }

    #[test]
    fn test_rank_of_minus_one_is_rejected() {
        let mut record = base_record();
        record.insert("P1Rank", -1.0);

        match EngineeredFeatures::from_record(&record).unwrap_err() {
            TennisError::NonFinite { name, .. } => assert_eq!(name, "winner_rank_points_ratio"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_missing_required_field() {
        let mut record = FeatureRecord::new();
        record.insert("P1Pts", 1.0);

        let err = engineer_features(&record).unwrap_err();
        assert!(matches!(err, TennisError::MissingFeature(_)));
    }
}

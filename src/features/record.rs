//! Named numeric feature values for a single match

use std::collections::BTreeMap;

use crate::{Result, TennisError};

/// Feature name to value, after categorical fields have been encoded
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRecord {
    values: BTreeMap<String, f64>,
}

impl FeatureRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    /// Value of a feature, failing if it is absent
    pub fn get(&self, name: &str) -> Result<f64> {
        self.values
            .get(name)
            .copied()
            .ok_or_else(|| TennisError::MissingFeature(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Select features in the given order.
    ///
    /// The result always has one entry per name; a missing name is an error.
    pub fn to_vector(&self, names: &[String]) -> Result<Vec<f64>> {
        names.iter().map(|name| self.get(name)).collect()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for FeatureRecord {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        FeatureRecord {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_follows_name_order() {
        let record: FeatureRecord = [("b", 2.0), ("a", 1.0), ("c", 3.0)].into_iter().collect();
        let names = vec!["c".to_string(), "a".to_string()];

        assert_eq!(record.to_vector(&names).unwrap(), vec![3.0, 1.0]);
    }

    #[test]
    fn test_vector_missing_name() {
        let record: FeatureRecord = [("a", 1.0)].into_iter().collect();
        let names = vec!["a".to_string(), "z".to_string()];

        match record.to_vector(&names).unwrap_err() {
            TennisError::MissingFeature(name) => assert_eq!(name, "z"),
            other => panic!("unexpected error: {}", other),
        }
    }
}

//! Row adapter contract.
//!
//! Ingestion hands rows to the resolver through [`InputRow`]. The resolver
//! only needs one nullable value per partition dimension; how a row stores
//! its values is up to the adapter.

use std::collections::BTreeMap;
use std::fmt::Debug;

/// A row that can yield values for named dimensions.
pub trait InputRow: Debug {
    /// All values the row holds for `dimension`, empty if absent.
    fn dimension_values(&self, dimension: &str) -> &[String];

    /// The single value used for partitioning.
    ///
    /// A dimension with exactly one value yields that value. Missing and
    /// multi-valued dimensions yield `None`, which sorts before every value.
    fn dimension_value(&self, dimension: &str) -> Option<&str> {
        match self.dimension_values(dimension) {
            [value] => Some(value.as_str()),
            _ => None,
        }
    }
}

/// In-memory row keyed by dimension name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapInputRow {
    dimensions: BTreeMap<String, Vec<String>>,
}

impl MapInputRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a row from single-valued `(dimension, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut row = Self::new();
        for (dimension, value) in pairs {
            row.set(dimension, value);
        }
        row
    }

    /// Replaces the values of `dimension` with a single value.
    pub fn set(&mut self, dimension: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.dimensions.insert(dimension.into(), vec![value.into()]);
        self
    }

    /// Replaces the values of `dimension` with `values`.
    pub fn set_multi<I, V>(&mut self, dimension: impl Into<String>, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.dimensions.insert(
            dimension.into(),
            values.into_iter().map(Into::into).collect(),
        );
        self
    }
}

impl InputRow for MapInputRow {
    fn dimension_values(&self, dimension: &str) -> &[String] {
        self.dimensions
            .get(dimension)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_value() {
        let row = MapInputRow::from_pairs([("country", "US")]);
        assert_eq!(row.dimension_value("country"), Some("US"));
        assert_eq!(row.dimension_values("country"), ["US".to_string()]);
    }

    #[test]
    fn test_missing_dimension_flattens_to_null() {
        let row = MapInputRow::from_pairs([("country", "US")]);
        assert_eq!(row.dimension_value("city"), None);
        assert!(row.dimension_values("city").is_empty());
    }

    #[test]
    fn test_multi_value_flattens_to_null() {
        let mut row = MapInputRow::new();
        row.set_multi("tags", ["a", "b"]);
        assert_eq!(row.dimension_value("tags"), None);

        row.set("tags", "a");
        assert_eq!(row.dimension_value("tags"), Some("a"));
    }

    #[test]
    fn test_empty_string_is_a_value() {
        let row = MapInputRow::from_pairs([("city", "")]);
        assert_eq!(row.dimension_value("city"), Some(""));
    }
}

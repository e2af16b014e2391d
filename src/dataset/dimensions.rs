//! Physical-dimension grouping of feature columns.
//!
//! SISSO only combines features whose units are compatible, and learns the
//! unit classes from `dimclass`, a list of 1-based column ranges. That
//! requires features sharing a unit to sit next to each other, so columns are
//! regrouped before the dataset is written.
//!
//! Ordering contract:
//! 1. features without a dimension form one group, emitted first;
//! 2. named groups follow in order of first appearance in the original
//!    column order;
//! 3. inside every group the original relative column order is kept.

use std::collections::BTreeMap;

use crate::core::constants::NO_DIMENSION_LABEL;
use crate::core::error::{Result, SissoError};

/// Mapping from feature name to its dimension label (`None` = dimensionless).
pub type FeatureDimensions = BTreeMap<String, Option<String>>;

/// 1-based inclusive column range of every dimension group, keyed by label.
pub type DimensionRanges = BTreeMap<Option<String>, (usize, usize)>;

/// Build a [`FeatureDimensions`] map from `(feature, label)` pairs.
pub fn dimension_map<'a, I>(pairs: I) -> FeatureDimensions
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(feature, label)| (feature.to_string(), Some(label.to_string())))
        .collect()
}

/// Result of regrouping feature columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureGrouping {
    /// Original column index of each column in the new order
    pub order: Vec<usize>,
    /// Dimension label of each column in the new order
    pub labels: Vec<Option<String>>,
}

/// Check a dimension mapping against the feature names of a table.
pub fn validate_dimensions(feature_names: &[String], dimensions: &FeatureDimensions) -> Result<()> {
    for (feature, label) in dimensions {
        if !feature_names.iter().any(|name| name == feature) {
            return Err(SissoError::invalid_dimension(format!(
                "feature \"{}\" is not a column of the dataset",
                feature
            )));
        }
        match label.as_deref() {
            Some(NO_DIMENSION_LABEL) => {
                return Err(SissoError::invalid_dimension(format!(
                    "\"{}\" is reserved and cannot be used as a dimension label (feature \"{}\")",
                    NO_DIMENSION_LABEL, feature
                )));
            }
            Some(label) if label.trim().is_empty() => {
                return Err(SissoError::invalid_dimension(format!(
                    "empty dimension label for feature \"{}\"",
                    feature
                )));
            }
            _ => {}
        }
    }
    Ok(())
}

/// Regroup feature columns by dimension label.
///
/// Two passes: the first assigns each column a group index, the second emits
/// the columns group by group.
pub fn group_features(
    feature_names: &[String],
    dimensions: &FeatureDimensions,
) -> Result<FeatureGrouping> {
    validate_dimensions(feature_names, dimensions)?;

    // Group 0 is the dimensionless group.
    let mut group_labels: Vec<Option<&str>> = vec![None];
    let mut assignment = Vec::with_capacity(feature_names.len());
    for name in feature_names {
        let group = match dimensions.get(name).and_then(|label| label.as_deref()) {
            None => 0,
            Some(label) => match group_labels.iter().position(|g| *g == Some(label)) {
                Some(index) => index,
                None => {
                    group_labels.push(Some(label));
                    group_labels.len() - 1
                }
            },
        };
        assignment.push(group);
    }

    let mut order = Vec::with_capacity(feature_names.len());
    let mut labels = Vec::with_capacity(feature_names.len());
    for (group, label) in group_labels.iter().enumerate() {
        for (column, _) in assignment.iter().enumerate().filter(|(_, g)| **g == group) {
            order.push(column);
            labels.push(label.map(str::to_string));
        }
    }

    log::debug!("Feature grouping: {} groups, order {:?}", group_labels.len(), order);
    Ok(FeatureGrouping { order, labels })
}

/// Column range of every group, given per-column labels that are already
/// contiguous.
pub fn dimension_ranges(labels: &[Option<String>]) -> DimensionRanges {
    let mut ranges = DimensionRanges::new();
    for (index, label) in labels.iter().enumerate() {
        let column = index + 1;
        ranges
            .entry(label.clone())
            .and_modify(|range| range.1 = column)
            .or_insert((column, column));
    }
    ranges
}

/// SISSO `dimclass` literal for the named groups, in column order.
///
/// Returns `None` when no named group exists.
pub fn dimclass(ranges: &DimensionRanges) -> Option<String> {
    let mut named: Vec<(usize, usize)> = ranges
        .iter()
        .filter(|(label, _)| label.is_some())
        .map(|(_, range)| *range)
        .collect();
    if named.is_empty() {
        return None;
    }
    named.sort_unstable();
    Some(
        named
            .iter()
            .map(|(start, end)| format!("({}:{})", start, end))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn names(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("feature{}", i)).collect()
    }

    fn unchanged(n: usize) -> FeatureGrouping {
        FeatureGrouping {
            order: (0..n).collect(),
            labels: vec![None; n],
        }
    }

    #[test]
    fn test_group_moves_named_features_after_dimensionless() {
        let dims = dimension_map([("feature1", "dim1"), ("feature3", "dim1")]);
        let grouping = group_features(&names(3), &dims).unwrap();
        assert_eq!(grouping.order, vec![1, 0, 2]);

        let ranges = dimension_ranges(&grouping.labels);
        let mut expected = DimensionRanges::new();
        expected.insert(Some("dim1".to_string()), (2, 3));
        expected.insert(None, (1, 1));
        assert_eq!(ranges, expected);
        assert_eq!(dimclass(&ranges).as_deref(), Some("(2:3)"));
    }

    #[test]
    fn test_named_groups_follow_first_appearance() {
        let dims = dimension_map([
            ("feature1", "energy"),
            ("feature2", "length"),
            ("feature4", "energy"),
        ]);
        let grouping = group_features(&names(5), &dims).unwrap();
        assert_eq!(grouping.order, vec![2, 4, 0, 3, 1]);
        let ranges = dimension_ranges(&grouping.labels);
        assert_eq!(ranges[&None], (1, 2));
        assert_eq!(ranges[&Some("energy".to_string())], (3, 4));
        assert_eq!(ranges[&Some("length".to_string())], (5, 5));
        assert_eq!(dimclass(&ranges).as_deref(), Some("(3:4)(5:5)"));
    }

    #[test]
    fn test_empty_mapping_is_identity() {
        let grouping = group_features(&names(3), &FeatureDimensions::new()).unwrap();
        assert_eq!(grouping, unchanged(3));
        let ranges = dimension_ranges(&grouping.labels);
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[&None], (1, 3));
        assert_eq!(dimclass(&ranges), None);
    }

    #[test]
    fn test_explicit_none_label_is_dimensionless() {
        let mut dims = FeatureDimensions::new();
        dims.insert("feature2".to_string(), None);
        let grouping = group_features(&names(2), &dims).unwrap();
        assert_eq!(grouping, unchanged(2));
    }

    #[test]
    fn test_reserved_label_rejected() {
        let dims = dimension_map([("feature1", NO_DIMENSION_LABEL)]);
        let err = group_features(&names(3), &dims).unwrap_err();
        assert!(matches!(err, SissoError::InvalidDimension { .. }));
    }

    #[test]
    fn test_unknown_feature_rejected() {
        let dims = dimension_map([("feature9", "dim1")]);
        assert!(group_features(&names(3), &dims).is_err());
    }

    proptest! {
        #[test]
        fn prop_groups_are_contiguous_and_stable(labels in prop::collection::vec(0usize..4, 1..12)) {
            let feature_names = names(labels.len());
            // label 0 means "no dimension"
            let dims: FeatureDimensions = feature_names
                .iter()
                .zip(&labels)
                .filter(|(_, l)| **l > 0)
                .map(|(n, l)| (n.clone(), Some(format!("dim{}", l))))
                .collect();
            let grouping = group_features(&feature_names, &dims).unwrap();

            // permutation of all columns
            let mut sorted = grouping.order.clone();
            sorted.sort_unstable();
            prop_assert_eq!(sorted, (0..labels.len()).collect::<Vec<_>>());

            // one range per distinct label, ranges tile 1..=n
            let ranges = dimension_ranges(&grouping.labels);
            let mut distinct = labels.clone();
            distinct.sort_unstable();
            distinct.dedup();
            prop_assert_eq!(ranges.len(), distinct.len());
            let covered: usize = ranges.values().map(|(s, e)| e - s + 1).sum();
            prop_assert_eq!(covered, labels.len());

            // original order kept inside each group
            for i in 1..grouping.order.len() {
                if grouping.labels[i - 1] == grouping.labels[i] {
                    prop_assert!(grouping.order[i - 1] < grouping.order[i]);
                }
            }

            // dimensionless group first
            if labels.contains(&0) {
                prop_assert_eq!(ranges[&None].0, 1);
            }
        }
    }
}

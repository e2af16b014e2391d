//! Cross-field validation of SISSO keywords.
//!
//! [`validate_keywords`] is the single place where keyword consistency is
//! enforced. It takes a plain [`KeywordSet`] and either returns it (possibly
//! with auto-fixed sizes) or the first rule it violates, so the
//! dataset-derived and the explicit-keyword construction paths behave
//! identically.

use thiserror::Error;

use crate::config::keywords::{KeywordSet, SampleCounts, SubspaceSize};
use crate::core::types::{DescriptorMethod, ModelType};

/// A violated keyword rule.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KeywordError {
    #[error("Wrong model_type (\"{0}\"). Should be \"regression\" or \"classification\".")]
    InvalidModelType(String),

    #[error("Wrong ptype ({0}). Should be 1 (regression) or 2 (classification).")]
    InvalidPtype(i64),

    #[error("Wrong method (\"{0}\"). Should be \"L0\" or \"L1L0\".")]
    InvalidMethod(String),

    #[error("Wrong metric (\"{0}\"). Should be \"RMSE\" or \"MaxAE\".")]
    InvalidMetric(String),

    #[error("Wrong task_weighting ({0}). Should be 1 or 2.")]
    InvalidTaskWeighting(i64),

    #[error("task_weighting={task_weighting} is only valid for regression; it must be unset for classification.")]
    TaskWeightingWithClassification { task_weighting: i64 },

    #[error("{keyword} is only valid for classification.")]
    ClassificationOnlyKeyword { keyword: &'static str },

    #[error("Per-class sample counts (nsample={nsample}) are only valid for classification.")]
    ClassCountsWithRegression { nsample: String },

    #[error("{keyword} must be at least 1 (got {value}).")]
    NotPositive { keyword: &'static str, value: usize },

    #[error("nsample describes {entries} task(s) but ntask={ntask}.")]
    SampleCountMismatch { entries: usize, ntask: usize },

    #[error("isconvex describes {entries} task(s) but ntask={ntask}.")]
    ConvexityTaskMismatch { entries: usize, ntask: usize },

    #[error("isconvex has {flags} flag(s) for task {task} but nsample lists {classes} class(es).")]
    ConvexityClassMismatch {
        task: usize,
        flags: usize,
        classes: usize,
    },

    #[error("maxfval_lb={lower} must be smaller than maxfval_ub={upper}.")]
    InvalidFeatureBounds { lower: f64, upper: f64 },

    #[error(
        "Dimension of descriptor (desc_dim={desc_dim}) is larger than the number of features \
         available for L0 norm from L1 screening (L1L0_size4L0={l1l0_size4l0})."
    )]
    DescriptorDimensionTooLarge { desc_dim: usize, l1l0_size4l0: usize },

    #[error(
        "Number of features to be screened by L1 for L0 (L1L0_size4L0={l1l0_size4l0}) is larger \
         than SIS-selected subspace (subs_sis={subs_sis})."
    )]
    SearchWidthExceedsSubspace { l1l0_size4l0: usize, subs_sis: usize },

    #[error(
        "Number of features to be screened by L1 for L0 (L1L0_size4L0={l1l0_size4l0}) is larger \
         than SIS-selected subspace (subs_sis={subs_sis}) of dimension {dimension}."
    )]
    SearchWidthExceedsSubspaceAtDimension {
        l1l0_size4l0: usize,
        subs_sis: usize,
        dimension: usize,
    },
}

/// Check every cross-field rule of `keywords`.
///
/// With `auto_fix`, sizes that are too small for the L0 search are raised
/// instead of rejected: `L1L0_size4L0` up to `desc_dim`, then every
/// deficient `subs_sis` entry up to `L1L0_size4L0`. Entries that are already
/// large enough are left untouched.
pub fn validate_keywords(
    mut keywords: KeywordSet,
    auto_fix: bool,
) -> std::result::Result<KeywordSet, KeywordError> {
    let ptype = keywords.target_properties.ptype;

    if ptype == ModelType::Classification {
        if let Some(weighting) = keywords.target_properties.task_weighting {
            return Err(KeywordError::TaskWeightingWithClassification {
                task_weighting: weighting.code(),
            });
        }
    } else {
        if keywords.descriptor_identification.isconvex.is_some() {
            return Err(KeywordError::ClassificationOnlyKeyword { keyword: "isconvex" });
        }
        if keywords.descriptor_identification.width.is_some() {
            return Err(KeywordError::ClassificationOnlyKeyword { keyword: "width" });
        }
    }

    check_positive("desc_dim", keywords.target_properties.desc_dim)?;
    check_positive("ntask", keywords.target_properties.ntask)?;
    check_positive("L1L0_size4L0", keywords.descriptor_identification.l1l0_size4l0)?;
    check_positive("nm_output", keywords.descriptor_identification.nm_output)?;
    if let Some(nsf) = keywords.feature_construction.nsf {
        check_positive("nsf", nsf)?;
    }
    match &keywords.feature_construction.subs_sis {
        SubspaceSize::Uniform(size) => check_positive("subs_sis", *size)?,
        SubspaceSize::PerDimension(sizes) => {
            check_positive("subs_sis", sizes.len())?;
            for &size in sizes {
                check_positive("subs_sis", size)?;
            }
        }
    }

    check_sample_counts(&keywords)?;
    check_convexity(&keywords)?;

    let (lower, upper) = (
        keywords.feature_construction.maxfval_lb,
        keywords.feature_construction.maxfval_ub,
    );
    if !(lower < upper) {
        return Err(KeywordError::InvalidFeatureBounds { lower, upper });
    }

    // Descriptor dimension against the L0 search width
    let desc_dim = keywords.target_properties.desc_dim;
    let width = keywords.descriptor_identification.l1l0_size4l0;
    if keywords.descriptor_identification.method == DescriptorMethod::L1L0 && desc_dim > width {
        if !auto_fix {
            return Err(KeywordError::DescriptorDimensionTooLarge {
                desc_dim,
                l1l0_size4l0: width,
            });
        }
        log::warn!("Raising L1L0_size4L0 from {} to desc_dim={}", width, desc_dim);
        keywords.descriptor_identification.l1l0_size4l0 = desc_dim;
    }

    // L0 search width against the SIS subspace
    let width = keywords.descriptor_identification.l1l0_size4l0;
    match &mut keywords.feature_construction.subs_sis {
        SubspaceSize::Uniform(size) => {
            if width > *size {
                if !auto_fix {
                    return Err(KeywordError::SearchWidthExceedsSubspace {
                        l1l0_size4l0: width,
                        subs_sis: *size,
                    });
                }
                log::warn!("Raising subs_sis from {} to L1L0_size4L0={}", size, width);
                *size = width;
            }
        }
        SubspaceSize::PerDimension(sizes) => {
            for (index, size) in sizes.iter_mut().enumerate() {
                if width > *size {
                    if !auto_fix {
                        return Err(KeywordError::SearchWidthExceedsSubspaceAtDimension {
                            l1l0_size4l0: width,
                            subs_sis: *size,
                            dimension: index + 1,
                        });
                    }
                    log::warn!(
                        "Raising subs_sis of dimension {} from {} to L1L0_size4L0={}",
                        index + 1,
                        size,
                        width
                    );
                    *size = width;
                }
            }
        }
    }

    Ok(keywords)
}

fn check_positive(keyword: &'static str, value: usize) -> std::result::Result<(), KeywordError> {
    if value == 0 {
        return Err(KeywordError::NotPositive { keyword, value });
    }
    Ok(())
}

fn check_sample_counts(keywords: &KeywordSet) -> std::result::Result<(), KeywordError> {
    let ntask = keywords.target_properties.ntask;
    let Some(nsample) = &keywords.target_properties.nsample else {
        return Ok(());
    };

    if let SampleCounts::PerTaskClass(_) = nsample {
        if keywords.target_properties.ptype != ModelType::Classification {
            return Err(KeywordError::ClassCountsWithRegression {
                nsample: nsample.to_value().fortran_literal(),
            });
        }
    }
    if nsample.num_tasks() != ntask {
        return Err(KeywordError::SampleCountMismatch {
            entries: nsample.num_tasks(),
            ntask,
        });
    }
    let counts: Vec<usize> = match nsample {
        SampleCounts::Total(count) => vec![*count],
        SampleCounts::PerTask(counts) => counts.clone(),
        SampleCounts::PerTaskClass(groups) => groups.iter().flatten().copied().collect(),
    };
    for count in counts {
        check_positive("nsample", count)?;
    }
    Ok(())
}

fn check_convexity(keywords: &KeywordSet) -> std::result::Result<(), KeywordError> {
    let Some(isconvex) = &keywords.descriptor_identification.isconvex else {
        return Ok(());
    };
    let ntask = keywords.target_properties.ntask;
    if isconvex.len() != ntask {
        return Err(KeywordError::ConvexityTaskMismatch {
            entries: isconvex.len(),
            ntask,
        });
    }

    let class_counts = keywords
        .target_properties
        .nsample
        .as_ref()
        .and_then(SampleCounts::class_counts);
    for (index, flags) in isconvex.iter().enumerate() {
        let classes = class_counts
            .and_then(|groups| groups.get(index))
            .map_or(flags.len(), Vec::len);
        if flags.is_empty() || flags.len() != classes {
            return Err(KeywordError::ConvexityClassMismatch {
                task: index + 1,
                flags: flags.len(),
                classes,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::TaskWeighting;

    fn l1l0(desc_dim: usize, width: usize, subs_sis: SubspaceSize) -> KeywordSet {
        let mut keywords = KeywordSet::default();
        keywords.descriptor_identification.method = DescriptorMethod::L1L0;
        keywords.target_properties.desc_dim = desc_dim;
        keywords.descriptor_identification.l1l0_size4l0 = width;
        keywords.feature_construction.subs_sis = subs_sis;
        keywords
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_keywords(KeywordSet::default(), false).is_ok());
        assert!(validate_keywords(KeywordSet::new(ModelType::Classification), false).is_ok());
    }

    #[test]
    fn test_desc_dim_larger_than_width() {
        let err = validate_keywords(l1l0(2, 1, SubspaceSize::Uniform(20)), false).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Dimension of descriptor (desc_dim=2) is larger than the number of features \
             available for L0 norm from L1 screening (L1L0_size4L0=1)."
        );

        let fixed = validate_keywords(l1l0(4, 2, SubspaceSize::Uniform(20)), true).unwrap();
        assert_eq!(fixed.descriptor_identification.l1l0_size4l0, 4);
        assert_eq!(fixed.target_properties.desc_dim, 4);
    }

    #[test]
    fn test_desc_dim_not_limited_for_l0() {
        let mut keywords = KeywordSet::default();
        keywords.target_properties.desc_dim = 3;
        assert!(validate_keywords(keywords, false).is_ok());
    }

    #[test]
    fn test_width_larger_than_uniform_subspace() {
        let err = validate_keywords(l1l0(1, 4, SubspaceSize::Uniform(2)), false).unwrap_err();
        assert_eq!(
            err,
            KeywordError::SearchWidthExceedsSubspace {
                l1l0_size4l0: 4,
                subs_sis: 2
            }
        );

        let fixed = validate_keywords(l1l0(1, 4, SubspaceSize::Uniform(2)), true).unwrap();
        assert_eq!(fixed.feature_construction.subs_sis, SubspaceSize::Uniform(4));
    }

    #[test]
    fn test_width_larger_than_per_dimension_subspace() {
        let err = validate_keywords(l1l0(1, 4, SubspaceSize::PerDimension(vec![8, 4, 2, 3])), false).unwrap_err();
        assert!(err.to_string().ends_with("(subs_sis=2) of dimension 3."));

        let fixed = validate_keywords(l1l0(1, 4, SubspaceSize::PerDimension(vec![8, 4, 2, 3])), true).unwrap();
        assert_eq!(
            fixed.feature_construction.subs_sis,
            SubspaceSize::PerDimension(vec![8, 4, 4, 4])
        );
    }

    #[test]
    fn test_classification_rejects_task_weighting() {
        let mut keywords = KeywordSet::new(ModelType::Classification);
        keywords.target_properties.task_weighting = Some(TaskWeighting::Equal);
        assert!(matches!(
            validate_keywords(keywords, true),
            Err(KeywordError::TaskWeightingWithClassification { task_weighting: 1 })
        ));
    }

    #[test]
    fn test_regression_rejects_classification_keywords() {
        let mut keywords = KeywordSet::default();
        keywords.descriptor_identification.width = Some(0.01);
        assert!(validate_keywords(keywords, false).is_err());
    }

    #[test]
    fn test_sample_counts_must_match_ntask() {
        let mut keywords = KeywordSet::default();
        keywords.target_properties.ntask = 2;
        keywords.target_properties.nsample = Some(SampleCounts::PerTask(vec![3, 2]));
        assert!(validate_keywords(keywords.clone(), false).is_ok());

        keywords.target_properties.nsample = Some(SampleCounts::Total(5));
        assert_eq!(
            validate_keywords(keywords, false).unwrap_err(),
            KeywordError::SampleCountMismatch { entries: 1, ntask: 2 }
        );
    }

    #[test]
    fn test_zero_sizes_rejected() {
        let mut keywords = KeywordSet::default();
        keywords.target_properties.desc_dim = 0;
        assert!(matches!(
            validate_keywords(keywords, true),
            Err(KeywordError::NotPositive { keyword: "desc_dim", .. })
        ));

        let mut keywords = KeywordSet::default();
        keywords.feature_construction.subs_sis = SubspaceSize::PerDimension(vec![]);
        assert!(validate_keywords(keywords, true).is_err());
    }

    #[test]
    fn test_convexity_shape_follows_nsample() {
        let mut keywords = KeywordSet::new(ModelType::Classification);
        keywords.target_properties.nsample = Some(SampleCounts::PerTaskClass(vec![vec![2, 2, 1]]));
        assert_eq!(
            validate_keywords(keywords.clone(), false).unwrap_err(),
            KeywordError::ConvexityClassMismatch {
                task: 1,
                flags: 2,
                classes: 3
            }
        );

        keywords.descriptor_identification.isconvex = Some(vec![vec![true, false, true]]);
        assert!(validate_keywords(keywords.clone(), false).is_ok());

        keywords.target_properties.ntask = 2;
        keywords.target_properties.nsample =
            Some(SampleCounts::PerTaskClass(vec![vec![2, 2, 1], vec![1, 1]]));
        assert_eq!(
            validate_keywords(keywords, false).unwrap_err(),
            KeywordError::ConvexityTaskMismatch { entries: 1, ntask: 2 }
        );
    }

    #[test]
    fn test_feature_bounds() {
        let mut keywords = KeywordSet::default();
        keywords.feature_construction.maxfval_lb = 10.0;
        keywords.feature_construction.maxfval_ub = 1.0;
        assert!(matches!(
            validate_keywords(keywords, false),
            Err(KeywordError::InvalidFeatureBounds { .. })
        ));
    }
}

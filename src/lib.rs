//! # sisso-prep
//!
//! Input preparation and completion checks for the SISSO descriptor
//! identification program.
//!
//! ## Features
//!
//! - **Dataset model**: load `train.dat` or CSV tables (or build them in
//!   memory from ndarray and Polars), track sample, feature and task counts,
//!   and regroup features by physical dimension.
//! - **Validated keywords**: every `SISSO.in` is produced from a keyword set
//!   that passed the cross-field rules SISSO itself does not check, with
//!   optional automatic fixing of too-small search sizes.
//! - **Completion check**: decide from the output, stdout and stderr
//!   artifacts whether a run finished normally.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sisso_prep::{dimension_map, LoaderConfig, SissoDataset, SissoIn};
//!
//! # fn main() -> sisso_prep::Result<()> {
//! let dimensions = dimension_map([("feature1", "dim1"), ("feature3", "dim1")]);
//! let dataset = SissoDataset::from_file("train.dat", &LoaderConfig::new(), Some(&dimensions))?;
//!
//! let sisso_in = SissoIn::builder_from_dataset(&dataset)
//!     .desc_dim(3)
//!     .subs_sis(vec![40usize, 20, 20])
//!     .build()?;
//!
//! sisso_prep::write_inputs("run", &dataset, &sisso_in)?;
//! # Ok(())
//! # }
//! ```
//!
//! After SISSO ran in `run/`:
//!
//! ```rust,no_run
//! use sisso_prep::{NormalCompletionValidator, Validator};
//!
//! let validator = NormalCompletionValidator::in_directory("run");
//! if validator.check() {
//!     println!("run incomplete: {}", validator.assess());
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]
#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    non_snake_case,
    non_upper_case_globals
)]

// Core infrastructure module - always available
pub mod core;

// Keyword configuration module
pub mod config;

// Dataset management module
pub mod dataset;

// Run artifact validators
pub mod validators;

use std::path::{Path, PathBuf};

// Re-export core functionality for convenience
pub use crate::core::{
    constants::*,
    error::{Result, SissoError},
    init_logging,
    types::*,
};

// Re-export configuration functionality
pub use config::{
    read_input_file, read_keywords, validate_keywords, DescriptorIdentificationKeywords,
    FeatureConstructionKeywords, KeywordError, KeywordOverrides, KeywordSet, SampleCounts,
    SissoIn, SissoInBuilder, SubspaceSize, TargetPropertiesKeywords,
};

// Re-export dataset functionality
pub use dataset::{
    dimension_map, load_feature_dimensions, CsvLoader, DataDialect, DataLoader, DatLoader,
    DimensionRanges, FeatureDimensions, LoaderConfig, SissoDataset,
};

// Re-export validators
pub use validators::{CompletionStatus, NormalCompletionValidator, Validator};

// Version information
pub use crate::core::CORE_MODULE_VERSION as VERSION;

/// Write `train.dat` and `SISSO.in` into `directory`.
///
/// The directory is created when missing. Fails without writing anything
/// if the input's model type, task, sample or feature counts, or dimension
/// groups disagree with the dataset. Split sample counts are compared task
/// by task (and class by class), not only by their total.
pub fn write_inputs<P: AsRef<Path>>(
    directory: P,
    dataset: &SissoDataset,
    sisso_in: &SissoIn,
) -> Result<(PathBuf, PathBuf)> {
    let directory = directory.as_ref();
    let target = sisso_in.target_properties_keywords();

    if target.ptype != dataset.model_type() {
        return Err(SissoError::inconsistent(
            "ptype",
            dataset.model_type(),
            target.ptype,
        ));
    }
    if target.ntask != dataset.ntask() {
        return Err(SissoError::inconsistent("ntask", dataset.ntask(), target.ntask));
    }
    if let Some(nsf) = sisso_in.feature_construction_keywords().nsf {
        if nsf != dataset.nsf() {
            return Err(SissoError::inconsistent("nsf", dataset.nsf(), nsf));
        }
    }
    if let Some(nsample) = &target.nsample {
        let expected = match nsample {
            SampleCounts::Total(_) => SampleCounts::Total(dataset.nsample()),
            SampleCounts::PerTask(_) => SampleCounts::PerTask(dataset.nsample_per_task()),
            SampleCounts::PerTaskClass(_) => {
                SampleCounts::PerTaskClass(dataset.nsample_per_task_and_class()?)
            }
        };
        if *nsample != expected {
            return Err(SissoError::inconsistent(
                "nsample",
                expected.to_value().fortran_literal(),
                nsample.to_value().fortran_literal(),
            ));
        }
    }
    let dimclass = &sisso_in.feature_construction_keywords().dimclass;
    if *dimclass != dataset.dimclass() {
        return Err(SissoError::inconsistent(
            "dimclass",
            dataset.dimclass().unwrap_or_else(|| "none".to_string()),
            dimclass.as_deref().unwrap_or("none"),
        ));
    }

    std::fs::create_dir_all(directory)?;
    let data_path = dataset.to_file(directory)?;
    let input_path = sisso_in.to_file(directory)?;
    Ok((data_path, input_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn dataset() -> SissoDataset {
        SissoDataset::from_arrays(
            vec!["m1".into(), "m2".into(), "m3".into()],
            array![1.0, 2.0, 3.0],
            vec!["f1".into(), "f2".into()],
            array![[0.1, 1.0], [0.2, 2.0], [0.3, 3.0]],
        )
        .unwrap()
    }

    #[test]
    fn test_write_inputs() {
        let dir = tempfile::TempDir::new().unwrap();
        let run = dir.path().join("run");
        let dataset = dataset();
        let sisso_in = SissoIn::from_dataset(&dataset).unwrap();

        let (data_path, input_path) = write_inputs(&run, &dataset, &sisso_in).unwrap();
        assert!(data_path.ends_with("train.dat"));
        assert!(input_path.ends_with("SISSO.in"));
        let text = std::fs::read_to_string(input_path).unwrap();
        assert!(text.contains("nsample=3\n"));
        assert!(text.contains("nsf=2\n"));
    }

    #[test]
    fn test_write_inputs_rejects_mismatch() {
        let dir = tempfile::TempDir::new().unwrap();
        let sisso_in = SissoIn::builder().nsf(5).build().unwrap();
        let err = write_inputs(dir.path(), &dataset(), &sisso_in).unwrap_err();
        assert!(matches!(err, SissoError::Inconsistent { field: "nsf", .. }));
        assert!(!dir.path().join("train.dat").exists());
    }

    #[test]
    fn test_write_inputs_compares_split_counts() {
        let dir = tempfile::TempDir::new().unwrap();
        let dataset = SissoDataset::from_arrays(
            (1..=5).map(|i| format!("m{}", i)).collect(),
            array![1.0, 2.0, 3.0, 4.0, 5.0],
            vec!["f1".into()],
            array![[0.1], [0.2], [0.3], [0.4], [0.5]],
        )
        .unwrap()
        .with_task_sizes(&[3, 2])
        .unwrap();

        let swapped = SissoIn::builder()
            .ntask(2)
            .nsample(SampleCounts::PerTask(vec![2, 3]))
            .build()
            .unwrap();
        let err = write_inputs(dir.path(), &dataset, &swapped).unwrap_err();
        assert_eq!(
            err.to_string(),
            "The size of the table does not match nsample (table has 3,2, got 2,3)."
        );
        assert!(!dir.path().join("SISSO.in").exists());

        let matching = SissoIn::from_dataset(&dataset).unwrap();
        assert!(write_inputs(dir.path(), &dataset, &matching).is_ok());
    }

    #[test]
    fn test_write_inputs_compares_class_counts() {
        let dir = tempfile::TempDir::new().unwrap();
        let dataset = SissoDataset::from_arrays(
            (1..=5).map(|i| format!("c{}", i)).collect(),
            array![0.0, 0.0, 1.0, 1.0, 1.0],
            vec!["f1".into()],
            array![[0.1], [0.2], [0.3], [0.4], [0.5]],
        )
        .unwrap()
        .with_model_type(ModelType::Classification)
        .unwrap();

        let sisso_in = SissoIn::builder()
            .model_type(ModelType::Classification)
            .nsample(SampleCounts::PerTaskClass(vec![vec![3, 2]]))
            .build()
            .unwrap();
        let err = write_inputs(dir.path(), &dataset, &sisso_in).unwrap_err();
        assert!(matches!(err, SissoError::Inconsistent { field: "nsample", .. }));
    }

    #[test]
    fn test_write_inputs_compares_dimclass() {
        let dir = tempfile::TempDir::new().unwrap();
        let dataset = dataset();
        let sisso_in = SissoIn::builder_from_dataset(&dataset)
            .dimclass(Some("(1:2)".to_string()))
            .build()
            .unwrap();
        let err = write_inputs(dir.path(), &dataset, &sisso_in).unwrap_err();
        assert_eq!(
            err.to_string(),
            "The size of the table does not match dimclass (table has none, got (1:2))."
        );
    }
}

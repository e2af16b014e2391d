//! In-memory SISSO training table.
//!
//! [`SissoDataset`] holds what SISSO reads from `train.dat`: one row per
//! sample with its identifier, target value (or class label) and feature
//! values, plus the task each row belongs to and the physical-dimension label
//! of every feature column. Sample, feature and task counts are derived from
//! the table and can never be overridden.

use ndarray::{Array1, Array2, Axis};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::constants::SISSO_DATA_FILE;
use crate::core::error::{Result, SissoError};
use crate::dataset_error;
use crate::core::types::{KeywordValue, ModelType};
use crate::dataset::dimensions::{self, DimensionRanges, FeatureDimensions};
use crate::dataset::loader::{DataDialect, DataLoader, LoaderConfig};
use crate::dataset::loader::csv::CsvLoader;
use crate::dataset::loader::dat::DatLoader;

/// Default header of the sample identifier column.
pub const DEFAULT_SAMPLE_COLUMN: &str = "materials";

/// Default header of the target column.
pub const DEFAULT_TARGET_COLUMN: &str = "property";

/// Training data for one SISSO run.
#[derive(Debug, Clone, PartialEq)]
pub struct SissoDataset {
    sample_column: String,
    target_column: String,
    sample_ids: Vec<String>,
    targets: Array1<f64>,
    feature_names: Vec<String>,
    features: Array2<f64>,
    /// 1-based task index of every row
    tasks: Vec<usize>,
    /// Dimension label of every feature column
    feature_dimensions: Vec<Option<String>>,
    model_type: ModelType,
}

impl SissoDataset {
    /// Build a single-task regression dataset from in-memory arrays.
    ///
    /// `features` has one row per sample and one column per entry of
    /// `feature_names`.
    pub fn from_arrays(
        sample_ids: Vec<String>,
        targets: Array1<f64>,
        feature_names: Vec<String>,
        features: Array2<f64>,
    ) -> Result<Self> {
        let num_samples = sample_ids.len();
        if num_samples == 0 {
            return Err(dataset_error!("dataset has no samples"));
        }
        if feature_names.is_empty() {
            return Err(dataset_error!("dataset has no feature columns"));
        }
        if targets.len() != num_samples {
            return Err(dataset_error!(
                "{} sample identifiers but {} target values",
                num_samples,
                targets.len()
            ));
        }
        if features.dim() != (num_samples, feature_names.len()) {
            return Err(dataset_error!(
                "feature matrix has shape {:?}, expected ({}, {})",
                features.dim(),
                num_samples,
                feature_names.len()
            ));
        }
        for name in feature_names.iter().chain(sample_ids.iter()) {
            check_token(name)?;
        }
        for (index, name) in feature_names.iter().enumerate() {
            if feature_names[..index].contains(name) {
                return Err(dataset_error!(
                    "duplicate feature column \"{}\"",
                    name
                ));
            }
        }
        if let Some(value) = targets.iter().chain(features.iter()).find(|v| !v.is_finite()) {
            return Err(dataset_error!(
                "non-finite value {} in dataset",
                value
            ));
        }

        let num_features = feature_names.len();
        Ok(SissoDataset {
            sample_column: DEFAULT_SAMPLE_COLUMN.to_string(),
            target_column: DEFAULT_TARGET_COLUMN.to_string(),
            sample_ids,
            targets,
            feature_names,
            features,
            tasks: vec![1; num_samples],
            feature_dimensions: vec![None; num_features],
            model_type: ModelType::Regression,
        })
    }

    /// Load a dataset file in the dialect selected by `config`, optionally
    /// regrouping its features by dimension.
    pub fn from_file<P: AsRef<Path>>(
        path: P,
        config: &LoaderConfig,
        feature_dimensions: Option<&FeatureDimensions>,
    ) -> Result<Self> {
        let dataset = match config.dialect {
            DataDialect::Dat => DatLoader::new(config.clone())?.load(path)?,
            DataDialect::Csv => CsvLoader::new(config.clone())?.load(path)?,
        };
        match feature_dimensions {
            Some(dimensions) => dataset.with_feature_dimensions(dimensions),
            None => Ok(dataset),
        }
    }

    /// Load a whitespace-delimited `train.dat` style file.
    pub fn from_dat_file<P: AsRef<Path>>(
        path: P,
        feature_dimensions: Option<&FeatureDimensions>,
    ) -> Result<Self> {
        Self::from_file(path, &LoaderConfig::default(), feature_dimensions)
    }

    /// Rename the sample identifier and target headers.
    pub fn with_column_names<S: Into<String>, T: Into<String>>(
        mut self,
        sample_column: S,
        target_column: T,
    ) -> Result<Self> {
        let sample_column = sample_column.into();
        let target_column = target_column.into();
        check_token(&sample_column)?;
        check_token(&target_column)?;
        self.sample_column = sample_column;
        self.target_column = target_column;
        Ok(self)
    }

    /// Assign a 1-based task index to every row.
    ///
    /// SISSO reads tasks as consecutive row blocks, so indices must start at
    /// 1, never decrease and never skip a value.
    pub fn with_tasks(mut self, tasks: Vec<usize>) -> Result<Self> {
        if tasks.len() != self.nsample() {
            return Err(dataset_error!(
                "{} task indices for {} samples",
                tasks.len(),
                self.nsample()
            ));
        }
        let mut previous = 0;
        for (row, &task) in tasks.iter().enumerate() {
            if task == 0 || (task != previous && task != previous + 1) {
                return Err(dataset_error!(
                    "row {} has task {} after task {}; tasks must be consecutive blocks numbered from 1",
                    row + 1,
                    task,
                    previous
                ));
            }
            previous = task;
        }
        self.tasks = tasks;
        if self.model_type == ModelType::Classification {
            self.nsample_per_task_and_class()?;
        }
        Ok(self)
    }

    /// Split the rows into consecutive task blocks of the given sizes.
    pub fn with_task_sizes(self, task_sizes: &[usize]) -> Result<Self> {
        let total: usize = task_sizes.iter().sum();
        if total != self.nsample() || task_sizes.iter().any(|&size| size == 0) {
            return Err(dataset_error!(
                "task sizes {:?} do not partition {} samples",
                task_sizes,
                self.nsample()
            ));
        }
        let tasks = task_sizes
            .iter()
            .enumerate()
            .flat_map(|(task, &size)| std::iter::repeat(task + 1).take(size))
            .collect();
        self.with_tasks(tasks)
    }

    /// Declare the kind of model the target column feeds.
    ///
    /// Classification requires integral class labels whose rows are
    /// contiguous within each task.
    pub fn with_model_type(mut self, model_type: ModelType) -> Result<Self> {
        self.model_type = model_type;
        if model_type == ModelType::Classification {
            self.nsample_per_task_and_class()?;
        }
        Ok(self)
    }

    /// Regroup the feature columns by physical dimension.
    ///
    /// Features missing from the mapping become dimensionless; an empty
    /// mapping therefore means "no grouping" and keeps the column order.
    pub fn with_feature_dimensions(mut self, feature_dimensions: &FeatureDimensions) -> Result<Self> {
        let grouping = dimensions::group_features(&self.feature_names, feature_dimensions)?;
        self.features = self.features.select(Axis(1), &grouping.order);
        self.feature_names = grouping
            .order
            .iter()
            .map(|&column| self.feature_names[column].clone())
            .collect();
        self.feature_dimensions = grouping.labels;
        log::debug!("Feature columns after grouping: {:?}", self.feature_names);
        Ok(self)
    }

    /// Header of the sample identifier column.
    pub fn sample_column(&self) -> &str {
        &self.sample_column
    }

    /// Header of the target column.
    pub fn target_column(&self) -> &str {
        &self.target_column
    }

    /// All column headers in file order.
    pub fn columns(&self) -> Vec<&str> {
        let mut columns = vec![self.sample_column.as_str(), self.target_column.as_str()];
        columns.extend(self.feature_names.iter().map(String::as_str));
        columns
    }

    /// Sample identifiers in row order.
    pub fn sample_ids(&self) -> &[String] {
        &self.sample_ids
    }

    /// Target values (or class labels) in row order.
    pub fn targets(&self) -> &Array1<f64> {
        &self.targets
    }

    /// Feature headers in column order.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Feature matrix, one row per sample.
    pub fn features(&self) -> &Array2<f64> {
        &self.features
    }

    /// Task index of every row.
    pub fn tasks(&self) -> &[usize] {
        &self.tasks
    }

    /// Dimension label of every feature column.
    pub fn feature_dimensions(&self) -> &[Option<String>] {
        &self.feature_dimensions
    }

    /// Kind of model the target column feeds.
    pub fn model_type(&self) -> ModelType {
        self.model_type
    }

    /// Number of samples (rows).
    pub fn nsample(&self) -> usize {
        self.sample_ids.len()
    }

    /// Number of primary features (feature columns).
    pub fn nsf(&self) -> usize {
        self.feature_names.len()
    }

    /// Alias of [`SissoDataset::nsf`].
    pub fn nfeature(&self) -> usize {
        self.nsf()
    }

    /// Number of distinct tasks.
    pub fn ntask(&self) -> usize {
        let mut tasks = self.tasks.clone();
        tasks.dedup();
        tasks.len()
    }

    /// `(nsample, nsf, ntask)`
    pub fn derived_counts(&self) -> (usize, usize, usize) {
        (self.nsample(), self.nsf(), self.ntask())
    }

    /// Number of samples in each task, in task order.
    pub fn nsample_per_task(&self) -> Vec<usize> {
        let mut counts = vec![0; self.ntask()];
        for &task in &self.tasks {
            counts[task - 1] += 1;
        }
        counts
    }

    /// Number of samples of each class inside each task, classes in the
    /// order their blocks appear.
    pub fn nsample_per_task_and_class(&self) -> Result<Vec<Vec<usize>>> {
        let mut per_task: Vec<Vec<usize>> = vec![Vec::new(); self.ntask()];
        let mut seen: Vec<Vec<i64>> = vec![Vec::new(); self.ntask()];
        let mut previous: Option<(usize, i64)> = None;

        for (row, (&task, &target)) in self.tasks.iter().zip(self.targets.iter()).enumerate() {
            if target.fract() != 0.0 {
                return Err(dataset_error!(
                    "class label {} of sample \"{}\" is not an integer",
                    target, self.sample_ids[row]
                ));
            }
            let label = target as i64;
            if previous == Some((task, label)) {
                if let Some(count) = per_task[task - 1].last_mut() {
                    *count += 1;
                }
            } else {
                if seen[task - 1].contains(&label) {
                    return Err(dataset_error!(
                        "samples of class {} in task {} are not contiguous (row {})",
                        label,
                        task,
                        row + 1
                    ));
                }
                seen[task - 1].push(label);
                per_task[task - 1].push(1);
            }
            previous = Some((task, label));
        }
        Ok(per_task)
    }

    /// Accept `value` as `nsample` only if it agrees with the table.
    ///
    /// An integer must equal the row count; a list must equal the per-task
    /// sample counts. The table is never modified.
    pub fn set_nsample<V: Into<KeywordValue>>(&mut self, value: V) -> Result<()> {
        match value.into() {
            KeywordValue::Int(count) => {
                if count < 0 || count as usize != self.nsample() {
                    return Err(SissoError::inconsistent("nsample", self.nsample(), count));
                }
                Ok(())
            }
            KeywordValue::IntList(counts) => {
                let actual: Vec<i64> = self.nsample_per_task().iter().map(|&c| c as i64).collect();
                if counts != actual {
                    return Err(SissoError::inconsistent(
                        "nsample",
                        format!("{:?}", actual),
                        format!("{:?}", counts),
                    ));
                }
                Ok(())
            }
            other => Err(SissoError::invalid_type("nsample", other.type_name())),
        }
    }

    /// Accept `value` as `nsf` only if it equals the feature column count.
    pub fn set_nsf<V: Into<KeywordValue>>(&mut self, value: V) -> Result<()> {
        let expected = self.nsf();
        check_count("nsf", value.into(), expected)
    }

    /// Alias of [`SissoDataset::set_nsf`].
    pub fn set_nfeature<V: Into<KeywordValue>>(&mut self, value: V) -> Result<()> {
        self.set_nsf(value)
    }

    /// Accept `value` as `ntask` only if it equals the distinct task count.
    pub fn set_ntask<V: Into<KeywordValue>>(&mut self, value: V) -> Result<()> {
        let expected = self.ntask();
        check_count("ntask", value.into(), expected)
    }

    /// Column range of every dimension group among the feature columns.
    pub fn dimension_ranges(&self) -> DimensionRanges {
        dimensions::dimension_ranges(&self.feature_dimensions)
    }

    /// SISSO `dimclass` literal, `None` without named dimension groups.
    pub fn dimclass(&self) -> Option<String> {
        dimensions::dimclass(&self.dimension_ranges())
    }

    /// Render the table in `train.dat` layout.
    pub fn to_dat_string(&self) -> String {
        let mut lines = vec![self.columns().join(" ")];
        for (row, sample_id) in self.sample_ids.iter().enumerate() {
            let mut fields = vec![sample_id.clone(), self.targets[row].to_string()];
            fields.extend(self.features.row(row).iter().map(|value| value.to_string()));
            lines.push(fields.join(" "));
        }
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    /// Write `train.dat` into `directory`, returning the written path.
    pub fn to_file<P: AsRef<Path>>(&self, directory: P) -> Result<PathBuf> {
        let path = directory.as_ref().join(SISSO_DATA_FILE);
        fs::write(&path, self.to_dat_string())?;
        log::info!(
            "Wrote {} ({} samples, {} features, {} tasks)",
            path.display(),
            self.nsample(),
            self.nsf(),
            self.ntask()
        );
        Ok(path)
    }
}

fn check_count(field: &'static str, value: KeywordValue, expected: usize) -> Result<()> {
    match value {
        KeywordValue::Int(count) if count >= 0 && count as usize == expected => Ok(()),
        KeywordValue::Int(count) => Err(SissoError::inconsistent(field, expected, count)),
        other => Err(SissoError::invalid_type(field, other.type_name())),
    }
}

/// Headers and identifiers are written whitespace-separated.
fn check_token(token: &str) -> Result<()> {
    if token.is_empty() || token.chars().any(char::is_whitespace) {
        return Err(dataset_error!(
            "\"{}\" cannot be written to train.dat: names must be non-empty and contain no whitespace",
            token
        ));
    }
    Ok(())
}

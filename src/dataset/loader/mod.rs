//! Dataset file loaders.
//!
//! Two on-disk dialects are supported, both producing the same
//! [`SissoDataset`](crate::dataset::SissoDataset) shape:
//!
//! - [`DataDialect::Dat`]: SISSO's own whitespace-delimited `train.dat`
//! - [`DataDialect::Csv`]: a delimited file with a header, dedicated sample
//!   and target columns and an optional task column

pub mod csv;
pub mod dat;
#[cfg(feature = "polars")]
pub mod polars;

pub use self::csv::CsvLoader;
pub use self::dat::DatLoader;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{Result, SissoError};
use crate::loading_error;
use crate::core::types::ModelType;
use crate::dataset::dataset::SissoDataset;

/// On-disk layout of a dataset file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataDialect {
    /// Whitespace-delimited with a `sample target features...` header
    Dat,
    /// Delimited with named sample/target/task columns
    Csv,
}

impl Default for DataDialect {
    fn default() -> Self {
        DataDialect::Dat
    }
}

impl std::str::FromStr for DataDialect {
    type Err = SissoError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dat" => Ok(DataDialect::Dat),
            "csv" => Ok(DataDialect::Csv),
            other => Err(SissoError::invalid_parameter(
                "dialect",
                other,
                "must be \"dat\" or \"csv\"",
            )),
        }
    }
}

/// Data loader configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// File layout
    pub dialect: DataDialect,
    /// Field delimiter (csv dialect only)
    pub delimiter: char,
    /// Sample identifier column (default: first column)
    pub sample_column: Option<String>,
    /// Target column (default: second column)
    pub target_column: Option<String>,
    /// Column holding 1-based task indices (csv dialect only)
    pub task_column: Option<String>,
    /// Sizes of consecutive task blocks, for files without a task column
    pub task_sizes: Option<Vec<usize>>,
    /// Kind of model the target column feeds
    pub model_type: ModelType,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig {
            dialect: DataDialect::Dat,
            delimiter: ',',
            sample_column: None,
            target_column: None,
            task_column: None,
            task_sizes: None,
            model_type: ModelType::Regression,
        }
    }
}

impl LoaderConfig {
    /// Create a new loader configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration for the csv dialect
    pub fn csv() -> Self {
        LoaderConfig {
            dialect: DataDialect::Csv,
            ..Self::default()
        }
    }

    /// Set the file dialect
    pub fn with_dialect(mut self, dialect: DataDialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Set the field delimiter
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the sample identifier column
    pub fn with_sample_column<S: Into<String>>(mut self, column: S) -> Self {
        self.sample_column = Some(column.into());
        self
    }

    /// Set the target column
    pub fn with_target_column<S: Into<String>>(mut self, column: S) -> Self {
        self.target_column = Some(column.into());
        self
    }

    /// Set the task column
    pub fn with_task_column<S: Into<String>>(mut self, column: S) -> Self {
        self.task_column = Some(column.into());
        self
    }

    /// Set consecutive task block sizes
    pub fn with_task_sizes(mut self, task_sizes: Vec<usize>) -> Self {
        self.task_sizes = Some(task_sizes);
        self
    }

    /// Set the model type
    pub fn with_model_type(mut self, model_type: ModelType) -> Self {
        self.model_type = model_type;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.task_column.is_some() && self.task_sizes.is_some() {
            return Err(SissoError::invalid_parameter(
                "task_sizes",
                format!("{:?}", self.task_sizes),
                "cannot be combined with a task column",
            ));
        }
        if self.dialect == DataDialect::Dat && self.task_column.is_some() {
            return Err(SissoError::invalid_parameter(
                "task_column",
                self.task_column.clone().unwrap_or_default(),
                "the dat dialect has no task column; use task_sizes",
            ));
        }
        if !self.delimiter.is_ascii() {
            return Err(SissoError::invalid_parameter(
                "delimiter",
                self.delimiter.to_string(),
                "must be an ASCII character",
            ));
        }
        Ok(())
    }
}

/// Data loader trait
pub trait DataLoader {
    /// Load data from source
    fn load<P: AsRef<Path>>(&self, path: P) -> Result<SissoDataset>;

    /// Get loader configuration
    fn config(&self) -> &LoaderConfig;
}

/// Table as parsed from a file, before it becomes a dataset.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    /// Header of the sample identifier column
    pub sample_column: String,
    /// Header of the target column
    pub target_column: String,
    /// Feature headers in file order
    pub feature_names: Vec<String>,
    /// Sample identifiers in row order
    pub sample_ids: Vec<String>,
    /// Target values in row order
    pub targets: Vec<f64>,
    /// Row-major feature values
    pub values: Vec<f64>,
    /// Task index of every row, when the file carries one
    pub tasks: Option<Vec<usize>>,
}

impl RawTable {
    /// Turn the parsed table into a dataset, applying the task layout and
    /// model type of `config`.
    pub fn into_dataset(self, config: &LoaderConfig) -> Result<SissoDataset> {
        if self.sample_ids.is_empty() {
            return Err(loading_error!("file contains no data rows"));
        }
        let shape = (self.sample_ids.len(), self.feature_names.len());
        let features = Array2::from_shape_vec(shape, self.values).map_err(|e| {
            loading_error!("feature values do not form a {:?} table: {}", shape, e)
        })?;

        let mut dataset = SissoDataset::from_arrays(
            self.sample_ids,
            Array1::from_vec(self.targets),
            self.feature_names,
            features,
        )?
        .with_column_names(self.sample_column, self.target_column)?;

        if let Some(tasks) = self.tasks {
            dataset = dataset.with_tasks(tasks)?;
        } else if let Some(ref task_sizes) = config.task_sizes {
            dataset = dataset.with_task_sizes(task_sizes)?;
        }
        dataset.with_model_type(config.model_type)
    }
}

/// Parse a numeric cell, naming the row and column on failure.
pub(crate) fn parse_number(cell: &str, line: usize, column: &str) -> Result<f64> {
    cell.trim().parse::<f64>().map_err(|_| {
        loading_error!(
            "line {}: cannot parse \"{}\" as a number for column \"{}\"",
            line, cell, column
        )
    })
}

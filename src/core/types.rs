//! Core data types shared by the dataset and configuration layers.
//!
//! The enumerations here map one-to-one onto the literal values SISSO reads
//! from `SISSO.in`, and [`KeywordValue`] is the dynamically typed value used
//! wherever a keyword has to be rendered or checked without knowing its
//! static type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::validation::KeywordError;

/// Kind of model SISSO should build (`ptype` keyword).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    /// Continuous target property (`ptype=1`)
    Regression,
    /// Class labels (`ptype=2`)
    Classification,
}

impl ModelType {
    /// Integer code used by the `ptype` keyword.
    pub fn ptype(self) -> i64 {
        match self {
            ModelType::Regression => 1,
            ModelType::Classification => 2,
        }
    }

    /// Resolve a `ptype` integer code.
    pub fn from_ptype(ptype: i64) -> std::result::Result<Self, KeywordError> {
        match ptype {
            1 => Ok(ModelType::Regression),
            2 => Ok(ModelType::Classification),
            other => Err(KeywordError::InvalidPtype(other)),
        }
    }

    /// Banner line written in front of the keyword sections.
    pub fn banner(self) -> &'static str {
        match self {
            ModelType::Regression => "! REGRESSION MODEL !",
            ModelType::Classification => "! CLASSIFICATION MODEL !",
        }
    }
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::Regression
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelType::Regression => write!(f, "regression"),
            ModelType::Classification => write!(f, "classification"),
        }
    }
}

impl FromStr for ModelType {
    type Err = KeywordError;

    /// Only the exact lowercase literals are accepted.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "regression" => Ok(ModelType::Regression),
            "classification" => Ok(ModelType::Classification),
            other => Err(KeywordError::InvalidModelType(other.to_string())),
        }
    }
}

/// Sparsifying operator used for the final descriptor selection (`method`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DescriptorMethod {
    /// Exhaustive L0 search over the SIS subspaces
    L0,
    /// L1 screening followed by an L0 search over `L1L0_size4L0` features
    L1L0,
}

impl Default for DescriptorMethod {
    fn default() -> Self {
        DescriptorMethod::L0
    }
}

impl fmt::Display for DescriptorMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptorMethod::L0 => write!(f, "L0"),
            DescriptorMethod::L1L0 => write!(f, "L1L0"),
        }
    }
}

impl FromStr for DescriptorMethod {
    type Err = KeywordError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "L0" => Ok(DescriptorMethod::L0),
            "L1L0" => Ok(DescriptorMethod::L1L0),
            other => Err(KeywordError::InvalidMethod(other.to_string())),
        }
    }
}

/// Weighting of tasks in multi-task regression (`task_weighting`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskWeighting {
    /// All tasks weighted equally (`1`)
    Equal,
    /// Tasks weighted by their number of samples (`2`)
    BySampleCount,
}

impl TaskWeighting {
    /// Integer code written to `SISSO.in`.
    pub fn code(self) -> i64 {
        match self {
            TaskWeighting::Equal => 1,
            TaskWeighting::BySampleCount => 2,
        }
    }

    /// Resolve an integer code.
    pub fn from_code(code: i64) -> std::result::Result<Self, KeywordError> {
        match code {
            1 => Ok(TaskWeighting::Equal),
            2 => Ok(TaskWeighting::BySampleCount),
            other => Err(KeywordError::InvalidTaskWeighting(other)),
        }
    }
}

/// Metric used to rank candidate models (`metric`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    /// Root mean squared error
    #[serde(rename = "RMSE")]
    Rmse,
    /// Maximum absolute error
    #[serde(rename = "MaxAE")]
    MaxAe,
}

impl Default for Metric {
    fn default() -> Self {
        Metric::Rmse
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Rmse => write!(f, "RMSE"),
            Metric::MaxAe => write!(f, "MaxAE"),
        }
    }
}

impl FromStr for Metric {
    type Err = KeywordError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "RMSE" => Ok(Metric::Rmse),
            "MaxAE" => Ok(Metric::MaxAe),
            other => Err(KeywordError::InvalidMetric(other.to_string())),
        }
    }
}

/// Dynamically typed keyword value.
///
/// Rendering follows what SISSO's Fortran namelist-style reader expects:
/// logicals as `.true.`/`.false.`, character values single-quoted, arrays
/// comma-joined and grouped arrays parenthesised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeywordValue {
    /// Integer literal
    Int(i64),
    /// Real literal
    Float(f64),
    /// Logical literal
    Bool(bool),
    /// Quoted character literal
    Str(String),
    /// Literal written verbatim (e.g. `dimclass=(2:3)`)
    Raw(String),
    /// Comma separated integers
    IntList(Vec<i64>),
    /// Parenthesised integer groups, e.g. `(2,3),(4,1)`
    Tuples(Vec<Vec<i64>>),
}

impl KeywordValue {
    /// Name of the value's type, as reported in type errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            KeywordValue::Int(_) => "int",
            KeywordValue::Float(_) => "float",
            KeywordValue::Bool(_) => "bool",
            KeywordValue::Str(_) | KeywordValue::Raw(_) => "str",
            KeywordValue::IntList(_) => "list",
            KeywordValue::Tuples(_) => "tuple list",
        }
    }

    /// Render the value as it appears on the right-hand side of `key=value`.
    pub fn fortran_literal(&self) -> String {
        match self {
            KeywordValue::Int(value) => value.to_string(),
            KeywordValue::Float(value) => format!("{:?}", value),
            KeywordValue::Bool(true) => ".true.".to_string(),
            KeywordValue::Bool(false) => ".false.".to_string(),
            KeywordValue::Str(value) => format!("'{}'", value),
            KeywordValue::Raw(value) => value.clone(),
            KeywordValue::IntList(values) => join_ints(values),
            KeywordValue::Tuples(groups) => groups
                .iter()
                .map(|group| format!("({})", join_ints(group)))
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

fn join_ints(values: &[i64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

impl fmt::Display for KeywordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fortran_literal())
    }
}

impl From<i64> for KeywordValue {
    fn from(value: i64) -> Self {
        KeywordValue::Int(value)
    }
}

impl From<i32> for KeywordValue {
    fn from(value: i32) -> Self {
        KeywordValue::Int(value as i64)
    }
}

impl From<usize> for KeywordValue {
    fn from(value: usize) -> Self {
        KeywordValue::Int(value as i64)
    }
}

impl From<f64> for KeywordValue {
    fn from(value: f64) -> Self {
        KeywordValue::Float(value)
    }
}

impl From<bool> for KeywordValue {
    fn from(value: bool) -> Self {
        KeywordValue::Bool(value)
    }
}

impl From<&str> for KeywordValue {
    fn from(value: &str) -> Self {
        KeywordValue::Str(value.to_string())
    }
}

impl From<String> for KeywordValue {
    fn from(value: String) -> Self {
        KeywordValue::Str(value)
    }
}

impl From<Vec<usize>> for KeywordValue {
    fn from(values: Vec<usize>) -> Self {
        KeywordValue::IntList(values.into_iter().map(|v| v as i64).collect())
    }
}

impl From<Vec<i64>> for KeywordValue {
    fn from(values: Vec<i64>) -> Self {
        KeywordValue::IntList(values)
    }
}

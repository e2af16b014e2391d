//! Error handling and error types for sisso-prep.
//!
//! Every fallible operation in the crate returns [`Result`], whose error
//! side is [`SissoError`]. Keyword cross-field violations keep their own
//! structured type ([`KeywordError`]) and are wrapped, not flattened, so
//! callers can still match on the exact rule that failed.

use std::io;
use thiserror::Error;

use crate::config::validation::KeywordError;

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum SissoError {
    /// Structural problems of an in-memory dataset
    #[error("Dataset error: {message}")]
    Dataset { message: String },

    /// Data file reading and parsing errors
    #[error("Data loading error: {message}")]
    DataLoading { message: String },

    /// Derived count assigned a value of the wrong type
    #[error("Type \"{type_name}\" is not valid for {field}.")]
    InvalidType {
        field: &'static str,
        type_name: &'static str,
    },

    /// Derived count assigned a value that disagrees with the table
    #[error("The size of the table does not match {field} (table has {expected}, got {actual}).")]
    Inconsistent {
        field: &'static str,
        expected: String,
        actual: String,
    },

    /// Invalid feature-dimension mapping
    #[error("Invalid feature dimension: {message}")]
    InvalidDimension { message: String },

    /// Keyword cross-field validation failure
    #[error("{source}")]
    Keyword {
        #[from]
        source: KeywordError,
    },

    /// Configuration file errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}, {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },

    /// File I/O errors
    #[error("I/O error: {source}")]
    IO {
        #[from]
        source: io::Error,
    },

    /// CSV parsing errors
    #[error("CSV parsing error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    /// JSON errors
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// TOML errors
    #[error("TOML error: {source}")]
    Toml {
        #[from]
        source: toml::de::Error,
    },

    /// Polars DataFrame errors
    #[cfg(feature = "polars")]
    #[error("Polars error: {source}")]
    Polars {
        #[from]
        source: polars::error::PolarsError,
    },
}

/// Type alias for Results using SissoError
pub type Result<T> = std::result::Result<T, SissoError>;

impl SissoError {
    /// Create a dataset error
    pub fn dataset<S: Into<String>>(message: S) -> Self {
        SissoError::Dataset {
            message: message.into(),
        }
    }

    /// Create a data loading error
    pub fn data_loading<S: Into<String>>(message: S) -> Self {
        SissoError::DataLoading {
            message: message.into(),
        }
    }

    /// Create a type error for a derived count
    pub fn invalid_type(field: &'static str, type_name: &'static str) -> Self {
        SissoError::InvalidType { field, type_name }
    }

    /// Create a consistency error for a derived count
    pub fn inconsistent<E, A>(field: &'static str, expected: E, actual: A) -> Self
    where
        E: ToString,
        A: ToString,
    {
        SissoError::Inconsistent {
            field,
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create a feature-dimension error
    pub fn invalid_dimension<S: Into<String>>(message: S) -> Self {
        SissoError::InvalidDimension {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        SissoError::Config {
            message: message.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter<P, V, R>(parameter: P, value: V, reason: R) -> Self
    where
        P: Into<String>,
        V: Into<String>,
        R: Into<String>,
    {
        SissoError::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            SissoError::Dataset { .. } => "dataset",
            SissoError::DataLoading { .. } => "data_loading",
            SissoError::InvalidType { .. } => "type",
            SissoError::Inconsistent { .. } => "consistency",
            SissoError::InvalidDimension { .. } => "validation",
            SissoError::Keyword { .. } => "validation",
            SissoError::Config { .. } => "config",
            SissoError::InvalidParameter { .. } => "invalid_parameter",
            SissoError::IO { .. } => "io",
            SissoError::Csv { .. } => "csv",
            SissoError::Json { .. } => "json",
            SissoError::Toml { .. } => "toml",
            #[cfg(feature = "polars")]
            SissoError::Polars { .. } => "polars",
        }
    }

    /// The wrapped keyword violation, if this is a keyword error.
    pub fn as_keyword_error(&self) -> Option<&KeywordError> {
        match self {
            SissoError::Keyword { source } => Some(source),
            _ => None,
        }
    }
}

/// Convenience macros for error creation
#[macro_export]
macro_rules! dataset_error {
    ($msg:expr) => {
        $crate::core::error::SissoError::dataset($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::core::error::SissoError::dataset(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! loading_error {
    ($msg:expr) => {
        $crate::core::error::SissoError::data_loading($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::core::error::SissoError::data_loading(format!($fmt, $($arg)*))
    };
}

//! Polars DataFrame loader.
//!
//! Builds a dataset from an in-memory DataFrame using the same column rules
//! as the csv dialect: sample and target columns default to the first two
//! columns, an optional task column holds 1-based task indices, and every
//! other column is a feature.

use polars::prelude::*;

use super::{LoaderConfig, RawTable};
use crate::core::error::Result;
use crate::loading_error;
use crate::dataset::dataset::SissoDataset;

impl SissoDataset {
    /// Build a dataset from a Polars DataFrame.
    pub fn from_polars(df: &DataFrame, config: &LoaderConfig) -> Result<Self> {
        config.validate()?;
        log::info!("Loading from Polars DataFrame with shape: {:?}", df.shape());

        let names: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect();
        let sample_index = column_index(&names, config.sample_column.as_deref(), Some(0))?;
        let target_index = column_index(&names, config.target_column.as_deref(), Some(1))?;
        let task_index = match config.task_column.as_deref() {
            Some(name) => Some(column_index(&names, Some(name), None)?),
            None => None,
        };
        let feature_indices: Vec<usize> = (0..names.len())
            .filter(|&i| i != sample_index && i != target_index && Some(i) != task_index)
            .collect();

        let sample_ids = string_column(df, &names[sample_index])?;
        let targets = float_column(df, &names[target_index])?;
        let tasks = match task_index {
            Some(index) => Some(
                float_column(df, &names[index])?
                    .into_iter()
                    .map(|task| {
                        if task >= 1.0 && task.fract() == 0.0 {
                            Ok(task as usize)
                        } else {
                            Err(loading_error!(
                                "task index {} is not a positive integer",
                                task
                            ))
                        }
                    })
                    .collect::<Result<Vec<_>>>()?,
            ),
            None => None,
        };

        let columns = feature_indices
            .iter()
            .map(|&i| float_column(df, &names[i]))
            .collect::<Result<Vec<_>>>()?;
        let mut values = Vec::with_capacity(df.height() * columns.len());
        for row in 0..df.height() {
            values.extend(columns.iter().map(|column| column[row]));
        }

        RawTable {
            sample_column: names[sample_index].clone(),
            target_column: names[target_index].clone(),
            feature_names: feature_indices.iter().map(|&i| names[i].clone()).collect(),
            sample_ids,
            targets,
            values,
            tasks,
        }
        .into_dataset(config)
    }
}

fn column_index(names: &[String], name: Option<&str>, default: Option<usize>) -> Result<usize> {
    match (name, default) {
        (Some(name), _) => names.iter().position(|n| n == name).ok_or_else(|| {
            loading_error!("column \"{}\" not found in DataFrame", name)
        }),
        (None, Some(index)) if index < names.len() => Ok(index),
        _ => Err(loading_error!(
            "DataFrame has only {} columns",
            names.len()
        )),
    }
}

fn float_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    series
        .f64()?
        .into_iter()
        .map(|value| {
            value.ok_or_else(|| {
                loading_error!("missing value in column \"{}\"", name)
            })
        })
        .collect()
}

fn string_column(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::String)?;
    series
        .str()?
        .into_iter()
        .map(|value| {
            value.map(str::to_string).ok_or_else(|| {
                loading_error!("missing value in column \"{}\"", name)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_polars() {
        let df = df!(
            "materials" => &["m1", "m2", "m3"],
            "property" => &[1.0, 2.0, 3.0],
            "feature1" => &[0.1, 0.2, 0.3],
            "feature2" => &[10.0, 20.0, 30.0]
        )
        .unwrap();
        let dataset = SissoDataset::from_polars(&df, &LoaderConfig::csv()).unwrap();
        assert_eq!(dataset.derived_counts(), (3, 2, 1));
        assert_eq!(dataset.features().row(1).to_vec(), vec![0.2, 20.0]);
    }
}

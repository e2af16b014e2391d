//! CSV file loader.
//!
//! Reads a delimited file with a header row. The sample identifier and target
//! columns default to the first two columns and can be named explicitly; an
//! optional task column carries 1-based task indices. Every other column is a
//! feature, kept in file order.

use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::{parse_number, DataLoader, LoaderConfig, RawTable};
use crate::core::error::Result;
use crate::loading_error;
use crate::dataset::dataset::SissoDataset;

/// CSV data loader
#[derive(Debug, Clone)]
pub struct CsvLoader {
    config: LoaderConfig,
}

impl CsvLoader {
    /// Create a new CSV loader
    pub fn new(config: LoaderConfig) -> Result<Self> {
        config.validate()?;
        Ok(CsvLoader { config })
    }

    /// Parse CSV data from any reader
    pub fn parse_reader<R: Read>(&self, reader: R) -> Result<RawTable> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.config.delimiter as u8)
            .has_headers(true)
            .trim(Trim::All)
            .comment(Some(b'#'))
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let sample_index = self.column_index(&headers, self.config.sample_column.as_deref(), Some(0))?;
        let target_index = self.column_index(&headers, self.config.target_column.as_deref(), Some(1))?;
        let task_index = match self.config.task_column.as_deref() {
            Some(name) => Some(self.column_index(&headers, Some(name), None)?),
            None => None,
        };
        if sample_index == target_index || task_index.is_some_and(|t| t == sample_index || t == target_index) {
            return Err(loading_error!(
                "sample, target and task columns must be different",
            ));
        }
        let feature_indices: Vec<usize> = (0..headers.len())
            .filter(|&i| i != sample_index && i != target_index && Some(i) != task_index)
            .collect();
        if feature_indices.is_empty() {
            return Err(loading_error!("file has no feature columns"));
        }

        let mut table = RawTable {
            sample_column: headers[sample_index].to_string(),
            target_column: headers[target_index].to_string(),
            feature_names: feature_indices.iter().map(|&i| headers[i].to_string()).collect(),
            tasks: task_index.map(|_| Vec::new()),
            ..RawTable::default()
        };

        for (row, result) in reader.records().enumerate() {
            let record = result?;
            // header is line 1
            let line = row + 2;
            table.sample_ids.push(record[sample_index].to_string());
            table
                .targets
                .push(parse_number(&record[target_index], line, &headers[target_index])?);
            if let (Some(index), Some(tasks)) = (task_index, table.tasks.as_mut()) {
                let task = record[index].parse::<usize>().map_err(|_| {
                    loading_error!(
                        "line {}: task index \"{}\" is not a positive integer",
                        line, &record[index]
                    )
                })?;
                tasks.push(task);
            }
            for &i in &feature_indices {
                table.values.push(parse_number(&record[i], line, &headers[i])?);
            }
        }

        log::debug!(
            "Parsed csv table: {} rows, {} features",
            table.sample_ids.len(),
            table.feature_names.len()
        );
        Ok(table)
    }

    fn column_index(
        &self,
        headers: &StringRecord,
        name: Option<&str>,
        default: Option<usize>,
    ) -> Result<usize> {
        match (name, default) {
            (Some(name), _) => headers.iter().position(|h| h == name).ok_or_else(|| {
                loading_error!("column \"{}\" not found in header", name)
            }),
            (None, Some(index)) if index < headers.len() => Ok(index),
            _ => Err(loading_error!(
                "header has only {} columns",
                headers.len()
            )),
        }
    }
}

impl DataLoader for CsvLoader {
    fn load<P: AsRef<Path>>(&self, path: P) -> Result<SissoDataset> {
        let path = path.as_ref();
        log::info!("Loading CSV file: {}", path.display());
        if !path.is_file() {
            return Err(loading_error!(
                "File does not exist: {}",
                path.display()
            ));
        }
        let file = File::open(path)?;
        self.parse_reader(file)?.into_dataset(&self.config)
    }

    fn config(&self) -> &LoaderConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::SissoError;

    #[test]
    fn test_default_leading_columns() {
        let loader = CsvLoader::new(LoaderConfig::csv()).unwrap();
        let table = loader
            .parse_reader("materials,property,f1,f2\nm1,1.5,2,3\nm2,2.5,4,5\n".as_bytes())
            .unwrap();
        assert_eq!(table.sample_column, "materials");
        assert_eq!(table.feature_names, vec!["f1", "f2"]);
        assert_eq!(table.targets, vec![1.5, 2.5]);
        assert_eq!(table.values, vec![2.0, 3.0, 4.0, 5.0]);
        assert!(table.tasks.is_none());
    }

    #[test]
    fn test_named_columns_and_tasks() {
        let config = LoaderConfig::csv()
            .with_sample_column("id")
            .with_target_column("gap")
            .with_task_column("task");
        let loader = CsvLoader::new(config).unwrap();
        let table = loader
            .parse_reader("f1,id,task,gap\n1,a,1,0.5\n2,b,2,0.7\n".as_bytes())
            .unwrap();
        assert_eq!(table.sample_ids, vec!["a", "b"]);
        assert_eq!(table.feature_names, vec!["f1"]);
        assert_eq!(table.tasks, Some(vec![1, 2]));
    }

    #[test]
    fn test_semicolon_delimiter() {
        let loader = CsvLoader::new(LoaderConfig::csv().with_delimiter(';')).unwrap();
        let table = loader.parse_reader("s;p;f\na;1;2\n".as_bytes()).unwrap();
        assert_eq!(table.values, vec![2.0]);
    }

    #[test]
    fn test_missing_column_rejected() {
        let loader = CsvLoader::new(LoaderConfig::csv().with_target_column("nope")).unwrap();
        assert!(loader.parse_reader("s,p,f\na,1,2\n".as_bytes()).is_err());
    }

    #[test]
    fn test_ragged_record_rejected() {
        let loader = CsvLoader::new(LoaderConfig::csv()).unwrap();
        let err = loader.parse_reader("s,p,f\na,1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, SissoError::Csv { .. }));
    }
}

//! Loader for SISSO's whitespace-delimited `train.dat` layout.
//!
//! ```text
//! materials property feature1 feature2
//! mat1      1.0      0.3      12
//! mat2      2.5      0.7      15
//! ```
//!
//! The first non-comment line is the header. Lines starting with `#` or `!`
//! and blank lines are skipped.

use std::fs;
use std::path::Path;

use super::{parse_number, DataLoader, LoaderConfig, RawTable};
use crate::core::error::Result;
use crate::loading_error;
use crate::dataset::dataset::SissoDataset;

/// Whitespace-delimited data loader
#[derive(Debug, Clone)]
pub struct DatLoader {
    config: LoaderConfig,
}

impl DatLoader {
    /// Create a new dat loader
    pub fn new(config: LoaderConfig) -> Result<Self> {
        config.validate()?;
        Ok(DatLoader { config })
    }

    /// Parse the text of a dat file
    pub fn parse_str(&self, text: &str) -> Result<RawTable> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with('#') && !line.starts_with('!'));

        let (_, header_line) = lines
            .next()
            .ok_or_else(|| loading_error!("file is empty"))?;
        let header: Vec<&str> = header_line.split_whitespace().collect();
        if header.len() < 3 {
            return Err(loading_error!(
                "header \"{}\" must name a sample column, a target column and at least one feature",
                header_line
            ));
        }

        let sample_index = self.column_index(&header, self.config.sample_column.as_deref(), 0)?;
        let target_index = self.column_index(&header, self.config.target_column.as_deref(), 1)?;
        if sample_index == target_index {
            return Err(loading_error!(
                "sample and target columns must be different",
            ));
        }
        let feature_indices: Vec<usize> = (0..header.len())
            .filter(|&i| i != sample_index && i != target_index)
            .collect();

        let mut table = RawTable {
            sample_column: header[sample_index].to_string(),
            target_column: header[target_index].to_string(),
            feature_names: feature_indices.iter().map(|&i| header[i].to_string()).collect(),
            ..RawTable::default()
        };

        for (line_number, line) in lines {
            let cells: Vec<&str> = line.split_whitespace().collect();
            if cells.len() != header.len() {
                return Err(loading_error!(
                    "line {}: expected {} columns, got {}",
                    line_number,
                    header.len(),
                    cells.len()
                ));
            }
            table.sample_ids.push(cells[sample_index].to_string());
            table
                .targets
                .push(parse_number(cells[target_index], line_number, header[target_index])?);
            for &i in &feature_indices {
                table.values.push(parse_number(cells[i], line_number, header[i])?);
            }
        }

        log::debug!(
            "Parsed dat table: {} rows, {} features",
            table.sample_ids.len(),
            table.feature_names.len()
        );
        Ok(table)
    }

    fn column_index(&self, header: &[&str], name: Option<&str>, default: usize) -> Result<usize> {
        match name {
            None => Ok(default),
            Some(name) => header.iter().position(|h| *h == name).ok_or_else(|| {
                loading_error!("column \"{}\" not found in header", name)
            }),
        }
    }
}

impl DataLoader for DatLoader {
    fn load<P: AsRef<Path>>(&self, path: P) -> Result<SissoDataset> {
        let path = path.as_ref();
        log::info!("Loading dat file: {}", path.display());
        if !path.is_file() {
            return Err(loading_error!(
                "File does not exist: {}",
                path.display()
            ));
        }
        let text = fs::read_to_string(path)?;
        self.parse_str(&text)?.into_dataset(&self.config)
    }

    fn config(&self) -> &LoaderConfig {
        &self.config
    }
}

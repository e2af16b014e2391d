//! Dataset management module.
//!
//! Loads SISSO training data from disk or memory, tracks the derived sample,
//! feature and task counts, groups features by physical dimension and writes
//! the `train.dat` file SISSO reads.

pub mod dataset;
pub mod dimensions;
pub mod loader;

// Re-export commonly used types
pub use dataset::{SissoDataset, DEFAULT_SAMPLE_COLUMN, DEFAULT_TARGET_COLUMN};
pub use dimensions::{dimension_map, DimensionRanges, FeatureDimensions, FeatureGrouping};
pub use loader::{CsvLoader, DataDialect, DataLoader, DatLoader, LoaderConfig, RawTable};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::core::error::{Result, SissoError};

/// On-disk form of a feature-dimension mapping.
///
/// ```toml
/// [dimensions]
/// feature1 = "energy"
/// feature3 = "energy"
/// ```
///
/// An empty string marks a feature as explicitly dimensionless.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DimensionsFile {
    /// Feature name to dimension label
    #[serde(default)]
    pub dimensions: BTreeMap<String, String>,
}

impl DimensionsFile {
    /// Convert to the in-memory mapping.
    pub fn into_feature_dimensions(self) -> FeatureDimensions {
        self.dimensions
            .into_iter()
            .map(|(feature, label)| {
                let label = if label.is_empty() { None } else { Some(label) };
                (feature, label)
            })
            .collect()
    }
}

/// Load a feature-dimension mapping from a `.toml` or `.json` file.
pub fn load_feature_dimensions<P: AsRef<Path>>(path: P) -> Result<FeatureDimensions> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        SissoError::config(format!("Failed to read dimensions file {}: {}", path.display(), e))
    })?;

    let file: DimensionsFile = match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => toml::from_str(&content)?,
        Some("json") => serde_json::from_str(&content)?,
        _ => {
            return Err(SissoError::config(
                "Unsupported dimensions file format. Use .json or .toml",
            ))
        }
    };
    log::debug!("Loaded {} feature dimensions from {}", file.dimensions.len(), path.display());
    Ok(file.into_feature_dimensions())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_toml_dimensions() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dims.toml");
        std::fs::write(&path, "[dimensions]\nfeature1 = \"dim1\"\nfeature2 = \"\"\n").unwrap();

        let dims = load_feature_dimensions(&path).unwrap();
        assert_eq!(dims["feature1"].as_deref(), Some("dim1"));
        assert_eq!(dims["feature2"], None);
    }

    #[test]
    fn test_load_json_dimensions() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dims.json");
        std::fs::write(&path, r#"{"dimensions": {"feature3": "dim2"}}"#).unwrap();

        let dims = load_feature_dimensions(&path).unwrap();
        assert_eq!(dims.len(), 1);
        assert_eq!(dims["feature3"].as_deref(), Some("dim2"));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dims.yaml");
        std::fs::write(&path, "dimensions: {}").unwrap();
        assert!(matches!(
            load_feature_dimensions(&path),
            Err(SissoError::Config { .. })
        ));
    }
}

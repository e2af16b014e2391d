//! Keyword overrides loaded from a configuration file.
//!
//! ```toml
//! model_type = "classification"
//! desc_dim = 3
//! method = "L1L0"
//! L1L0_size4L0 = 5
//! subs_sis = [20, 10, 10]
//! auto_fix = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::keywords::SubspaceSize;
use crate::core::error::{Result, SissoError};
use crate::core::types::{DescriptorMethod, Metric, ModelType};

/// Optional keyword values applied on top of the defaults.
///
/// Counts derived from the data (`ntask`, `nsample`, `nsf`, `dimclass`) are
/// not part of the overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeywordOverrides {
    pub model_type: Option<ModelType>,
    /// SISSO code, 1 or 2
    pub task_weighting: Option<i64>,
    pub desc_dim: Option<usize>,
    pub restart: Option<bool>,
    pub rung: Option<usize>,
    pub opset: Option<String>,
    pub maxcomplexity: Option<usize>,
    pub maxfval_lb: Option<f64>,
    pub maxfval_ub: Option<f64>,
    pub subs_sis: Option<SubspaceSize>,
    pub method: Option<DescriptorMethod>,
    #[serde(rename = "L1L0_size4L0")]
    pub l1l0_size4l0: Option<usize>,
    pub fit_intercept: Option<bool>,
    pub metric: Option<Metric>,
    pub nm_output: Option<usize>,
    pub isconvex: Option<Vec<Vec<bool>>>,
    pub width: Option<f64>,
    /// Raise too-small search sizes instead of failing
    pub auto_fix: Option<bool>,
}

impl KeywordOverrides {
    /// Load overrides from a `.toml` or `.json` file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| SissoError::config(format!("Failed to read config file: {}", e)))?;

        let overrides = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| SissoError::config(format!("Failed to parse JSON config: {}", e)))?,
            Some("toml") => toml::from_str(&content)
                .map_err(|e| SissoError::config(format!("Failed to parse TOML config: {}", e)))?,
            _ => {
                return Err(SissoError::config(
                    "Unsupported config file format. Use .json or .toml",
                ))
            }
        };
        log::debug!("Loaded keyword overrides from {}", path.display());
        Ok(overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_toml_overrides() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sisso.toml");
        std::fs::write(
            &path,
            "model_type = \"classification\"\nmethod = \"L1L0\"\nL1L0_size4L0 = 5\nsubs_sis = [20, 10]\n",
        )
        .unwrap();

        let overrides = KeywordOverrides::load_from_file(&path).unwrap();
        assert_eq!(overrides.model_type, Some(ModelType::Classification));
        assert_eq!(overrides.method, Some(DescriptorMethod::L1L0));
        assert_eq!(overrides.l1l0_size4l0, Some(5));
        assert_eq!(overrides.subs_sis, Some(SubspaceSize::PerDimension(vec![20, 10])));
        assert_eq!(overrides.desc_dim, None);
    }

    #[test]
    fn test_load_json_overrides() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sisso.json");
        std::fs::write(&path, r#"{"desc_dim": 3, "metric": "MaxAE", "subs_sis": 40}"#).unwrap();

        let overrides = KeywordOverrides::load_from_file(&path).unwrap();
        assert_eq!(overrides.desc_dim, Some(3));
        assert_eq!(overrides.metric, Some(Metric::MaxAe));
        assert_eq!(overrides.subs_sis, Some(SubspaceSize::Uniform(40)));
    }

    #[test]
    fn test_unknown_keyword_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sisso.toml");
        std::fs::write(&path, "desc_dimension = 3\n").unwrap();
        assert!(matches!(
            KeywordOverrides::load_from_file(&path),
            Err(SissoError::Config { .. })
        ));
    }
}

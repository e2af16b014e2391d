//! Keyword configuration for SISSO runs.
//!
//! This module holds the keyword groups of a `SISSO.in` file, the rules that
//! keep them consistent, the builder that assembles a validated
//! [`SissoIn`], and file-based keyword overrides.

pub mod core;
pub mod keywords;
pub mod overrides;
pub mod reader;
pub mod validation;

// Re-export commonly used configuration types
pub use self::core::{SissoIn, SissoInBuilder};
pub use keywords::{
    DescriptorIdentificationKeywords, FeatureConstructionKeywords, KeywordSet, SampleCounts,
    SubspaceSize, TargetPropertiesKeywords,
};
pub use overrides::KeywordOverrides;
pub use reader::{read_input_file, read_keywords};
pub use validation::{validate_keywords, KeywordError};

/// Default overrides file looked up by the command-line tool
pub const DEFAULT_CONFIG_FILE: &str = "sisso.toml";

//! Common test utilities for sisso-prep integration tests.
#![allow(dead_code)]

use sisso_prep::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Five samples, three features, single task.
pub const TRAIN_DAT_REGRESSION: &str = "\
materials property feature1 feature2 feature3
mat1 1.25 0.1 10.0 100.0
mat2 2.5 0.2 20.0 200.0
mat3 3.75 0.3 30.0 300.0
mat4 5.0 0.4 40.0 400.0
mat5 6.25 0.5 50.0 500.0
";

/// Two classes in one task, class blocks contiguous.
pub const TRAIN_CSV_CLASSIFICATION: &str = "\
compound,label,radius,charge
c1,0,1.1,1
c2,0,1.3,1
c3,1,0.7,2
c4,1,0.6,2
c5,1,0.5,3
";

/// Three classes in one task.
pub const TRAIN_CSV_THREE_CLASSES: &str = "\
compound,label,radius,charge
c1,0,1.1,1
c2,0,1.3,1
c3,1,0.7,2
c4,1,0.6,2
c5,2,0.5,3
";

/// Two tasks of 2 and 4 samples; the second task holds three classes.
pub const TRAIN_CSV_TWO_TASKS: &str = "\
compound,label,radius,charge
c1,0,1.1,1
c2,1,1.3,1
c3,0,0.7,2
c4,1,0.6,2
c5,1,0.5,3
c6,2,0.4,3
";

/// Write `content` to `dir/name` and return the path.
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write fixture");
    path
}

/// The regression fixture loaded from a temporary `train.dat`.
pub fn regression_dataset(dir: &Path, dimensions: Option<&FeatureDimensions>) -> SissoDataset {
    let path = write_file(dir, "train.dat", TRAIN_DAT_REGRESSION);
    SissoDataset::from_dat_file(path, dimensions).expect("Failed to load regression fixture")
}

/// The classification fixture loaded from a temporary csv file.
pub fn classification_dataset(dir: &Path) -> SissoDataset {
    let path = write_file(dir, "train.csv", TRAIN_CSV_CLASSIFICATION);
    let config = LoaderConfig::csv().with_model_type(ModelType::Classification);
    SissoDataset::from_file(path, &config, None).expect("Failed to load classification fixture")
}

/// Keyword set for an L1L0 search.
pub fn l1l0_keywords(
    ptype: ModelType,
    desc_dim: usize,
    l1l0_size4l0: usize,
    subs_sis: SubspaceSize,
) -> KeywordSet {
    let mut keywords = KeywordSet::new(ptype);
    keywords.descriptor_identification.method = DescriptorMethod::L1L0;
    keywords.target_properties.desc_dim = desc_dim;
    keywords.descriptor_identification.l1l0_size4l0 = l1l0_size4l0;
    keywords.feature_construction.subs_sis = subs_sis;
    keywords
}

/// Load a classification csv fixture, optionally split in tasks.
pub fn classification_fixture(
    dir: &Path,
    content: &str,
    task_sizes: Option<Vec<usize>>,
) -> SissoDataset {
    let path = write_file(dir, "classes.csv", content);
    let mut config = LoaderConfig::csv().with_model_type(ModelType::Classification);
    if let Some(sizes) = task_sizes {
        config = config.with_task_sizes(sizes);
    }
    SissoDataset::from_file(path, &config, None).expect("Failed to load classification fixture")
}

//! Plain keyword records of a `SISSO.in` file.
//!
//! Keywords are split in the three groups SISSO documents: target
//! properties, feature construction with sure independence screening, and
//! descriptor identification. Each group lists its keywords in the order they
//! are written, and a keyword whose value is `None` is left out of the file.

use serde::{Deserialize, Serialize};

use crate::core::constants::*;
use crate::core::types::{DescriptorMethod, KeywordValue, Metric, ModelType, TaskWeighting};

/// Size of the SIS-selected subspace (`subs_sis`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubspaceSize {
    /// Same size for every descriptor dimension
    Uniform(usize),
    /// One size per descriptor dimension, first entry for dimension 1
    PerDimension(Vec<usize>),
}

impl SubspaceSize {
    /// Keyword value as written to `SISSO.in`.
    pub fn to_value(&self) -> KeywordValue {
        match self {
            SubspaceSize::Uniform(size) => KeywordValue::from(*size),
            SubspaceSize::PerDimension(sizes) => KeywordValue::from(sizes.clone()),
        }
    }
}

impl Default for SubspaceSize {
    fn default() -> Self {
        SubspaceSize::Uniform(DEFAULT_SUBS_SIS)
    }
}

impl From<usize> for SubspaceSize {
    fn from(size: usize) -> Self {
        SubspaceSize::Uniform(size)
    }
}

impl From<Vec<usize>> for SubspaceSize {
    fn from(sizes: Vec<usize>) -> Self {
        SubspaceSize::PerDimension(sizes)
    }
}

/// Number of samples (`nsample`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SampleCounts {
    /// Single task
    Total(usize),
    /// One count per task
    PerTask(Vec<usize>),
    /// Per task, one count per class (classification)
    PerTaskClass(Vec<Vec<usize>>),
}

impl SampleCounts {
    /// Keyword value as written to `SISSO.in`.
    pub fn to_value(&self) -> KeywordValue {
        match self {
            SampleCounts::Total(count) => KeywordValue::from(*count),
            SampleCounts::PerTask(counts) => KeywordValue::from(counts.clone()),
            SampleCounts::PerTaskClass(groups) => KeywordValue::Tuples(
                groups
                    .iter()
                    .map(|group| group.iter().map(|&c| c as i64).collect())
                    .collect(),
            ),
        }
    }

    /// Per-task class counts, if the counts are split by class.
    pub fn class_counts(&self) -> Option<&[Vec<usize>]> {
        match self {
            SampleCounts::PerTaskClass(groups) => Some(groups),
            _ => None,
        }
    }

    /// Number of tasks the counts describe.
    pub fn num_tasks(&self) -> usize {
        match self {
            SampleCounts::Total(_) => 1,
            SampleCounts::PerTask(counts) => counts.len(),
            SampleCounts::PerTaskClass(groups) => groups.len(),
        }
    }
}

/// Keywords describing the target property and the descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetPropertiesKeywords {
    /// Regression or classification (`ptype`)
    pub ptype: ModelType,
    /// Number of tasks
    pub ntask: usize,
    /// Number of samples
    pub nsample: Option<SampleCounts>,
    /// Task weighting, regression only
    pub task_weighting: Option<TaskWeighting>,
    /// Dimension of the descriptor
    pub desc_dim: usize,
    /// Restart from a previous run
    pub restart: bool,
}

impl TargetPropertiesKeywords {
    /// Defaults for the given kind of model.
    pub fn new(ptype: ModelType) -> Self {
        TargetPropertiesKeywords {
            ptype,
            ntask: 1,
            nsample: None,
            task_weighting: match ptype {
                ModelType::Regression => Some(TaskWeighting::Equal),
                ModelType::Classification => None,
            },
            desc_dim: DEFAULT_DESC_DIM,
            restart: false,
        }
    }

    /// Keywords in file order.
    pub fn entries(&self) -> Vec<(&'static str, Option<KeywordValue>)> {
        vec![
            ("ptype", Some(KeywordValue::Int(self.ptype.ptype()))),
            ("ntask", Some(KeywordValue::from(self.ntask))),
            ("nsample", self.nsample.as_ref().map(SampleCounts::to_value)),
            (
                "task_weighting",
                self.task_weighting.map(|w| KeywordValue::Int(w.code())),
            ),
            ("desc_dim", Some(KeywordValue::from(self.desc_dim))),
            ("restart", Some(KeywordValue::Bool(self.restart))),
        ]
    }
}

impl Default for TargetPropertiesKeywords {
    fn default() -> Self {
        Self::new(ModelType::Regression)
    }
}

/// Keywords controlling feature construction and SIS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureConstructionKeywords {
    /// Number of primary (scalar) features
    pub nsf: Option<usize>,
    /// Rung of the feature space
    pub rung: usize,
    /// Operator set
    pub opset: String,
    /// Maximal number of operators in a feature
    pub maxcomplexity: usize,
    /// Column ranges of dimension groups
    pub dimclass: Option<String>,
    /// Lower bound of feature values
    pub maxfval_lb: f64,
    /// Upper bound of feature values
    pub maxfval_ub: f64,
    /// SIS-selected subspace size
    pub subs_sis: SubspaceSize,
}

impl Default for FeatureConstructionKeywords {
    fn default() -> Self {
        FeatureConstructionKeywords {
            nsf: None,
            rung: DEFAULT_RUNG,
            opset: DEFAULT_OPSET.to_string(),
            maxcomplexity: DEFAULT_MAXCOMPLEXITY,
            dimclass: None,
            maxfval_lb: DEFAULT_MAXFVAL_LB,
            maxfval_ub: DEFAULT_MAXFVAL_UB,
            subs_sis: SubspaceSize::default(),
        }
    }
}

impl FeatureConstructionKeywords {
    /// Keywords in file order.
    pub fn entries(&self) -> Vec<(&'static str, Option<KeywordValue>)> {
        vec![
            ("nsf", self.nsf.map(KeywordValue::from)),
            ("rung", Some(KeywordValue::from(self.rung))),
            ("opset", Some(KeywordValue::Str(self.opset.clone()))),
            ("maxcomplexity", Some(KeywordValue::from(self.maxcomplexity))),
            ("dimclass", self.dimclass.clone().map(KeywordValue::Raw)),
            ("maxfval_lb", Some(KeywordValue::Float(self.maxfval_lb))),
            ("maxfval_ub", Some(KeywordValue::Float(self.maxfval_ub))),
            ("subs_sis", Some(self.subs_sis.to_value())),
        ]
    }
}

/// Keywords controlling descriptor identification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptorIdentificationKeywords {
    /// Sparsifying operator
    pub method: DescriptorMethod,
    /// Features kept by L1 screening for the L0 search
    #[serde(rename = "L1L0_size4L0")]
    pub l1l0_size4l0: usize,
    /// Fit an intercept
    pub fit_intercept: bool,
    /// Model ranking metric
    pub metric: Metric,
    /// Number of best models written out
    pub nm_output: usize,
    /// Convexity of each class domain, one tuple per task, classification only
    pub isconvex: Option<Vec<Vec<bool>>>,
    /// Boundary tolerance, classification only
    pub width: Option<f64>,
}

impl DescriptorIdentificationKeywords {
    /// Defaults for the given kind of model.
    pub fn new(ptype: ModelType) -> Self {
        let classification = ptype == ModelType::Classification;
        DescriptorIdentificationKeywords {
            method: DescriptorMethod::L0,
            l1l0_size4l0: DEFAULT_L1L0_SIZE4L0,
            fit_intercept: true,
            metric: Metric::Rmse,
            nm_output: DEFAULT_NM_OUTPUT,
            isconvex: classification.then(|| vec![vec![true, true]]),
            width: classification.then_some(DEFAULT_WIDTH),
        }
    }

    /// Keywords in file order.
    pub fn entries(&self) -> Vec<(&'static str, Option<KeywordValue>)> {
        vec![
            ("method", Some(KeywordValue::Str(self.method.to_string()))),
            ("L1L0_size4L0", Some(KeywordValue::from(self.l1l0_size4l0))),
            ("fit_intercept", Some(KeywordValue::Bool(self.fit_intercept))),
            ("metric", Some(KeywordValue::Str(self.metric.to_string()))),
            ("nm_output", Some(KeywordValue::from(self.nm_output))),
            (
                "isconvex",
                self.isconvex.as_ref().map(|tasks| {
                    KeywordValue::Tuples(
                        tasks
                            .iter()
                            .map(|flags| flags.iter().map(|&f| f as i64).collect())
                            .collect(),
                    )
                }),
            ),
            ("width", self.width.map(KeywordValue::Float)),
        ]
    }
}

/// Every class domain convex: one tuple per task with one flag per class.
///
/// Class counts come from `nsample` when it is split by class; otherwise
/// each task is assumed to hold two classes.
pub fn convex_domains(target: &TargetPropertiesKeywords) -> Vec<Vec<bool>> {
    match target.nsample.as_ref().and_then(SampleCounts::class_counts) {
        Some(groups) => groups.iter().map(|classes| vec![true; classes.len()]).collect(),
        None => vec![vec![true, true]; target.ntask],
    }
}

impl Default for DescriptorIdentificationKeywords {
    fn default() -> Self {
        Self::new(ModelType::Regression)
    }
}

/// Every keyword of a `SISSO.in` file, before or after validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordSet {
    /// Target property keywords
    pub target_properties: TargetPropertiesKeywords,
    /// Feature construction and SIS keywords
    pub feature_construction: FeatureConstructionKeywords,
    /// Descriptor identification keywords
    pub descriptor_identification: DescriptorIdentificationKeywords,
}

impl KeywordSet {
    /// Defaults for the given kind of model.
    pub fn new(ptype: ModelType) -> Self {
        KeywordSet {
            target_properties: TargetPropertiesKeywords::new(ptype),
            feature_construction: FeatureConstructionKeywords::default(),
            descriptor_identification: DescriptorIdentificationKeywords::new(ptype),
        }
    }

    /// All keywords that have a value, in file order.
    pub fn entries(&self) -> Vec<(&'static str, KeywordValue)> {
        self.target_properties
            .entries()
            .into_iter()
            .chain(self.feature_construction.entries())
            .chain(self.descriptor_identification.entries())
            .filter_map(|(key, value)| value.map(|value| (key, value)))
            .collect()
    }

    /// Value of a keyword by its `SISSO.in` name.
    pub fn get(&self, key: &str) -> Option<KeywordValue> {
        self.entries()
            .into_iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regression_defaults() {
        let keywords = KeywordSet::default();
        assert_eq!(keywords.get("ptype"), Some(KeywordValue::Int(1)));
        assert_eq!(keywords.get("task_weighting"), Some(KeywordValue::Int(1)));
        assert_eq!(keywords.get("method"), Some(KeywordValue::Str("L0".into())));
        assert_eq!(keywords.get("subs_sis"), Some(KeywordValue::Int(20)));
        assert_eq!(keywords.get("isconvex"), None);
        assert_eq!(keywords.get("nsample"), None);
    }

    #[test]
    fn test_classification_defaults() {
        let keywords = KeywordSet::new(ModelType::Classification);
        assert_eq!(keywords.get("ptype"), Some(KeywordValue::Int(2)));
        assert_eq!(keywords.get("task_weighting"), None);
        assert_eq!(
            keywords.get("isconvex").map(|v| v.fortran_literal()),
            Some("(1,1)".to_string())
        );
        assert_eq!(keywords.get("width"), Some(KeywordValue::Float(0.001)));
    }

    #[test]
    fn test_entry_order() {
        let keys: Vec<&str> = KeywordSet::default()
            .target_properties
            .entries()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(
            keys,
            vec!["ptype", "ntask", "nsample", "task_weighting", "desc_dim", "restart"]
        );
    }

    #[test]
    fn test_sample_counts_rendering() {
        assert_eq!(SampleCounts::Total(5).to_value().fortran_literal(), "5");
        assert_eq!(SampleCounts::PerTask(vec![3, 2]).to_value().fortran_literal(), "3,2");
        assert_eq!(
            SampleCounts::PerTaskClass(vec![vec![2, 3], vec![1, 4]])
                .to_value()
                .fortran_literal(),
            "(2,3),(1,4)"
        );
        assert_eq!(SampleCounts::PerTask(vec![3, 2]).num_tasks(), 2);
    }

    #[test]
    fn test_convex_domains_follow_class_counts() {
        let mut target = TargetPropertiesKeywords::new(ModelType::Classification);
        assert_eq!(convex_domains(&target), vec![vec![true, true]]);

        target.ntask = 2;
        target.nsample = Some(SampleCounts::PerTaskClass(vec![vec![2, 2, 1], vec![3, 1]]));
        assert_eq!(
            convex_domains(&target),
            vec![vec![true, true, true], vec![true, true]]
        );

        let mut keywords = KeywordSet::new(ModelType::Classification);
        keywords.descriptor_identification.isconvex = Some(convex_domains(&target));
        assert_eq!(
            keywords.get("isconvex").map(|v| v.fortran_literal()),
            Some("(1,1,1),(1,1)".to_string())
        );
    }
}

//! The validated `SISSO.in` input and its builder.
//!
//! [`SissoIn`] is immutable once built: every construction path funnels the
//! keywords through [`validate_keywords`], so a value of this type always
//! satisfies the cross-field rules. Use [`SissoInBuilder`] to set keywords
//! fluently, or [`SissoIn::from_keywords`] when a complete [`KeywordSet`] is
//! at hand.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::keywords::{
    convex_domains, DescriptorIdentificationKeywords, FeatureConstructionKeywords, KeywordSet,
    SampleCounts, SubspaceSize, TargetPropertiesKeywords,
};
use crate::config::overrides::KeywordOverrides;
use crate::config::validation::validate_keywords;
use crate::core::constants::{BANNER_WIDTH, SISSO_INPUT_FILE};
use crate::core::error::{Result, SissoError};
use crate::core::types::{DescriptorMethod, KeywordValue, Metric, ModelType, TaskWeighting};
use crate::dataset::SissoDataset;

/// A validated SISSO input file.
#[derive(Debug, Clone, PartialEq)]
pub struct SissoIn {
    keywords: KeywordSet,
}

impl SissoIn {
    /// Start building an input with default keywords.
    pub fn builder() -> SissoInBuilder {
        SissoInBuilder::new()
    }

    /// Input for `dataset` with every other keyword at its default.
    pub fn from_dataset(dataset: &SissoDataset) -> Result<Self> {
        SissoInBuilder::from_dataset(dataset).build()
    }

    /// Builder seeded from `dataset`, see [`SissoInBuilder::from_dataset`].
    pub fn builder_from_dataset(dataset: &SissoDataset) -> SissoInBuilder {
        SissoInBuilder::from_dataset(dataset)
    }

    /// Validate a complete keyword set.
    pub fn from_keywords(keywords: KeywordSet, auto_fix: bool) -> Result<Self> {
        let keywords = validate_keywords(keywords, auto_fix)?;
        Ok(SissoIn { keywords })
    }

    /// All keywords.
    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    /// Target property keywords.
    pub fn target_properties_keywords(&self) -> &TargetPropertiesKeywords {
        &self.keywords.target_properties
    }

    /// Feature construction and SIS keywords.
    pub fn feature_construction_keywords(&self) -> &FeatureConstructionKeywords {
        &self.keywords.feature_construction
    }

    /// Descriptor identification keywords.
    pub fn descriptor_identification_keywords(&self) -> &DescriptorIdentificationKeywords {
        &self.keywords.descriptor_identification
    }

    /// Value of a keyword by its `SISSO.in` name.
    pub fn get(&self, key: &str) -> Option<KeywordValue> {
        self.keywords.get(key)
    }

    /// Kind of model the input describes.
    pub fn model_type(&self) -> ModelType {
        self.keywords.target_properties.ptype
    }

    /// Whether this is a regression input.
    pub fn is_regression(&self) -> bool {
        self.model_type() == ModelType::Regression
    }

    /// Whether this is a classification input.
    pub fn is_classification(&self) -> bool {
        self.model_type() == ModelType::Classification
    }

    /// Render the complete `SISSO.in` text.
    ///
    /// A provenance header and the model banner come first, then one
    /// commented section per keyword group. Keywords without a value are
    /// omitted.
    pub fn input_string(&self) -> String {
        let rule = "!".repeat(BANNER_WIDTH);
        let mut lines = vec![
            rule.clone(),
            format!("! SISSO.in generated by sisso-prep {}", crate::VERSION),
            rule.clone(),
            String::new(),
            rule.clone(),
            self.model_type().banner().to_string(),
            rule,
        ];

        let sections = [
            (
                "Keywords for the target properties",
                self.keywords.target_properties.entries(),
            ),
            (
                "Keywords for feature construction and sure independence screening",
                self.keywords.feature_construction.entries(),
            ),
            (
                "Keywords for descriptor identification",
                self.keywords.descriptor_identification.entries(),
            ),
        ];
        for (title, entries) in sections {
            lines.push(String::new());
            lines.push(format!("! {}", title));
            for (key, value) in entries {
                if let Some(value) = value {
                    lines.push(format!("{}={}", key, value.fortran_literal()));
                }
            }
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    /// Write `SISSO.in` into `directory`, returning the written path.
    pub fn to_file<P: AsRef<Path>>(&self, directory: P) -> Result<PathBuf> {
        let path = directory.as_ref().join(SISSO_INPUT_FILE);
        fs::write(&path, self.input_string())?;
        log::info!("Wrote {} ({} model)", path.display(), self.model_type());
        Ok(path)
    }
}

impl fmt::Display for SissoIn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.input_string())
    }
}

/// Fluent builder for [`SissoIn`].
///
/// Setters never fail; a rejected value is recorded and reported by
/// [`build`](SissoInBuilder::build). Keywords whose default depends on the
/// model type (`task_weighting`, `isconvex`, `width`) are resolved at build
/// time unless set explicitly; the `isconvex` default has one tuple per task
/// and one flag per class counted in `nsample`.
#[derive(Debug)]
pub struct SissoInBuilder {
    keywords: KeywordSet,
    task_weighting: Option<Option<TaskWeighting>>,
    isconvex: Option<Vec<Vec<bool>>>,
    width: Option<f64>,
    auto_fix: bool,
    validation_errors: Vec<SissoError>,
}

impl SissoInBuilder {
    /// Create a builder with regression defaults.
    pub fn new() -> Self {
        SissoInBuilder {
            keywords: KeywordSet::default(),
            task_weighting: None,
            isconvex: None,
            width: None,
            auto_fix: false,
            validation_errors: Vec::new(),
        }
    }

    /// Builder seeded with the counts and dimension groups of `dataset`.
    ///
    /// Sets `ptype`, `ntask`, `nsample`, `nsf` and `dimclass`. Classification
    /// datasets get per-task class counts for `nsample`.
    pub fn from_dataset(dataset: &SissoDataset) -> Self {
        let mut builder = Self::new()
            .model_type(dataset.model_type())
            .ntask(dataset.ntask())
            .nsf(dataset.nsf())
            .dimclass(dataset.dimclass());

        let nsample = match dataset.model_type() {
            ModelType::Classification => match dataset.nsample_per_task_and_class() {
                Ok(groups) => Some(SampleCounts::PerTaskClass(groups)),
                Err(err) => {
                    builder.validation_errors.push(err);
                    None
                }
            },
            ModelType::Regression if dataset.ntask() > 1 => {
                Some(SampleCounts::PerTask(dataset.nsample_per_task()))
            }
            ModelType::Regression => Some(SampleCounts::Total(dataset.nsample())),
        };
        builder.keywords.target_properties.nsample = nsample;
        builder
    }

    /// Set the kind of model.
    pub fn model_type(mut self, model_type: ModelType) -> Self {
        self.keywords.target_properties.ptype = model_type;
        self
    }

    /// Set the kind of model from `"regression"` or `"classification"`.
    pub fn problem_type(mut self, problem_type: &str) -> Self {
        match problem_type.parse::<ModelType>() {
            Ok(model_type) => self.keywords.target_properties.ptype = model_type,
            Err(err) => self.validation_errors.push(err.into()),
        }
        self
    }

    /// Set the kind of model from its SISSO code (1 or 2).
    pub fn ptype(mut self, ptype: i64) -> Self {
        match ModelType::from_ptype(ptype) {
            Ok(model_type) => self.keywords.target_properties.ptype = model_type,
            Err(err) => self.validation_errors.push(err.into()),
        }
        self
    }

    /// Set the number of tasks.
    pub fn ntask(mut self, ntask: usize) -> Self {
        self.keywords.target_properties.ntask = ntask;
        self
    }

    /// Set the sample counts, total or per task.
    pub fn nsample(mut self, nsample: SampleCounts) -> Self {
        self.keywords.target_properties.nsample = Some(nsample);
        self
    }

    /// Set the task weighting; `None` leaves the keyword out of the file.
    pub fn task_weighting(mut self, task_weighting: Option<TaskWeighting>) -> Self {
        self.task_weighting = Some(task_weighting);
        self
    }

    /// Set the descriptor dimension.
    pub fn desc_dim(mut self, desc_dim: usize) -> Self {
        self.keywords.target_properties.desc_dim = desc_dim;
        self
    }

    /// Restart from the files of a previous run.
    pub fn restart(mut self, restart: bool) -> Self {
        self.keywords.target_properties.restart = restart;
        self
    }

    /// Set the number of primary features.
    pub fn nsf(mut self, nsf: usize) -> Self {
        self.keywords.feature_construction.nsf = Some(nsf);
        self
    }

    /// Set the feature space rung.
    pub fn rung(mut self, rung: usize) -> Self {
        self.keywords.feature_construction.rung = rung;
        self
    }

    /// Set the operator set, e.g. `"(+)(-)(*)"`.
    pub fn opset<S: Into<String>>(mut self, opset: S) -> Self {
        let opset = opset.into();
        if opset.trim().is_empty() {
            self.validation_errors
                .push(SissoError::invalid_parameter("opset", &opset, "must not be empty"));
        }
        self.keywords.feature_construction.opset = opset;
        self
    }

    /// Set the maximal number of operators in a feature.
    pub fn maxcomplexity(mut self, maxcomplexity: usize) -> Self {
        self.keywords.feature_construction.maxcomplexity = maxcomplexity;
        self
    }

    /// Set the dimension group ranges, `None` for no grouping.
    pub fn dimclass(mut self, dimclass: Option<String>) -> Self {
        self.keywords.feature_construction.dimclass = dimclass;
        self
    }

    /// Set the lower bound of feature values.
    pub fn maxfval_lb(mut self, bound: f64) -> Self {
        self.keywords.feature_construction.maxfval_lb = bound;
        self
    }

    /// Set the upper bound of feature values.
    pub fn maxfval_ub(mut self, bound: f64) -> Self {
        self.keywords.feature_construction.maxfval_ub = bound;
        self
    }

    /// Set the SIS subspace size, uniform or per dimension.
    pub fn subs_sis<S: Into<SubspaceSize>>(mut self, subs_sis: S) -> Self {
        self.keywords.feature_construction.subs_sis = subs_sis.into();
        self
    }

    /// Set the sparsifying operator.
    pub fn method(mut self, method: DescriptorMethod) -> Self {
        self.keywords.descriptor_identification.method = method;
        self
    }

    /// Set the sparsifying operator from `"L0"` or `"L1L0"`.
    pub fn method_name(mut self, method: &str) -> Self {
        match method.parse::<DescriptorMethod>() {
            Ok(method) => self.keywords.descriptor_identification.method = method,
            Err(err) => self.validation_errors.push(err.into()),
        }
        self
    }

    /// Set how many features L1 screening keeps for the L0 search.
    pub fn l1l0_size4l0(mut self, size: usize) -> Self {
        self.keywords.descriptor_identification.l1l0_size4l0 = size;
        self
    }

    /// Fit an intercept in the linear models.
    pub fn fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.keywords.descriptor_identification.fit_intercept = fit_intercept;
        self
    }

    /// Set the metric used to rank models.
    pub fn metric(mut self, metric: Metric) -> Self {
        self.keywords.descriptor_identification.metric = metric;
        self
    }

    /// Set how many of the best models are written out.
    pub fn nm_output(mut self, nm_output: usize) -> Self {
        self.keywords.descriptor_identification.nm_output = nm_output;
        self
    }

    /// Set domain convexity, one tuple per task with one flag per class.
    /// Classification only.
    pub fn isconvex(mut self, isconvex: Vec<Vec<bool>>) -> Self {
        self.isconvex = Some(isconvex);
        self
    }

    /// Set the boundary tolerance, classification only.
    pub fn width(mut self, width: f64) -> Self {
        if !(width >= 0.0) {
            self.validation_errors
                .push(SissoError::invalid_parameter("width", width.to_string(), "must be non-negative"));
        }
        self.width = Some(width);
        self
    }

    /// Raise too-small search sizes instead of rejecting them.
    pub fn auto_fix(mut self, auto_fix: bool) -> Self {
        self.auto_fix = auto_fix;
        self
    }

    /// Apply every keyword set in `overrides`.
    pub fn apply_overrides(mut self, overrides: &KeywordOverrides) -> Self {
        if let Some(model_type) = overrides.model_type {
            self = self.model_type(model_type);
        }
        if let Some(code) = overrides.task_weighting {
            match TaskWeighting::from_code(code) {
                Ok(weighting) => self = self.task_weighting(Some(weighting)),
                Err(err) => self.validation_errors.push(err.into()),
            }
        }
        if let Some(desc_dim) = overrides.desc_dim {
            self = self.desc_dim(desc_dim);
        }
        if let Some(restart) = overrides.restart {
            self = self.restart(restart);
        }
        if let Some(rung) = overrides.rung {
            self = self.rung(rung);
        }
        if let Some(opset) = &overrides.opset {
            self = self.opset(opset.clone());
        }
        if let Some(maxcomplexity) = overrides.maxcomplexity {
            self = self.maxcomplexity(maxcomplexity);
        }
        if let Some(bound) = overrides.maxfval_lb {
            self = self.maxfval_lb(bound);
        }
        if let Some(bound) = overrides.maxfval_ub {
            self = self.maxfval_ub(bound);
        }
        if let Some(subs_sis) = &overrides.subs_sis {
            self = self.subs_sis(subs_sis.clone());
        }
        if let Some(method) = overrides.method {
            self = self.method(method);
        }
        if let Some(size) = overrides.l1l0_size4l0 {
            self = self.l1l0_size4l0(size);
        }
        if let Some(fit_intercept) = overrides.fit_intercept {
            self = self.fit_intercept(fit_intercept);
        }
        if let Some(metric) = overrides.metric {
            self = self.metric(metric);
        }
        if let Some(nm_output) = overrides.nm_output {
            self = self.nm_output(nm_output);
        }
        if let Some(isconvex) = &overrides.isconvex {
            self = self.isconvex(isconvex.clone());
        }
        if let Some(width) = overrides.width {
            self = self.width(width);
        }
        if let Some(auto_fix) = overrides.auto_fix {
            self = self.auto_fix(auto_fix);
        }
        self
    }

    /// Resolve model-dependent defaults and validate.
    pub fn build(self) -> Result<SissoIn> {
        if let Some(err) = self.validation_errors.into_iter().next() {
            return Err(err);
        }

        let mut keywords = self.keywords;
        let classification = keywords.target_properties.ptype == ModelType::Classification;
        keywords.target_properties.task_weighting = match self.task_weighting {
            Some(explicit) => explicit,
            None if classification => None,
            None => Some(TaskWeighting::Equal),
        };
        keywords.descriptor_identification.isconvex = match self.isconvex {
            Some(explicit) => Some(explicit),
            None if classification => Some(convex_domains(&keywords.target_properties)),
            None => None,
        };
        let defaults = DescriptorIdentificationKeywords::new(keywords.target_properties.ptype);
        keywords.descriptor_identification.width = self.width.or(defaults.width);

        SissoIn::from_keywords(keywords, self.auto_fix)
    }
}

impl Default for SissoInBuilder {
    fn default() -> Self {
        Self::new()
    }
}

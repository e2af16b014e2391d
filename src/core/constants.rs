//! File names, reserved literals and SISSO keyword defaults.
//!
//! Defaults mirror the template `SISSO.in` distributed with SISSO, so a
//! configuration built without overrides behaves like the reference input.

/// Canonical name of the SISSO input file.
pub const SISSO_INPUT_FILE: &str = "SISSO.in";

/// Canonical name of the SISSO training data file.
pub const SISSO_DATA_FILE: &str = "train.dat";

/// Default primary output file checked for normal completion.
pub const DEFAULT_OUTPUT_FILE: &str = "SISSO.out";

/// Default file receiving SISSO's standard output.
pub const DEFAULT_STDOUT_FILE: &str = "SISSO.log";

/// Default file receiving SISSO's standard error.
pub const DEFAULT_STDERR_FILE: &str = "SISSO.err";

/// Marker SISSO prints as the last line of a successful run.
pub const COMPLETION_MARKER: &[u8] = b"Have a nice day !";

/// Reserved label standing for "no physical dimension".
/// Users cannot pass it as a dimension label.
pub const NO_DIMENSION_LABEL: &str = "_NODIM";

/// Default dimension of the descriptor.
pub const DEFAULT_DESC_DIM: usize = 2;

/// Default rung of the feature space construction.
pub const DEFAULT_RUNG: usize = 2;

/// Full operator set of SISSO.
pub const DEFAULT_OPSET: &str = "(+)(-)(*)(/)(exp)(exp-)(^-1)(^2)(^3)(sqrt)(cbrt)(log)(|-|)(scd)(^6)(sin)(cos)";

/// Default maximal complexity (number of operators) of a feature.
pub const DEFAULT_MAXCOMPLEXITY: usize = 10;

/// Features whose values fall below this bound are discarded.
pub const DEFAULT_MAXFVAL_LB: f64 = 1e-3;

/// Features whose values exceed this bound are discarded.
pub const DEFAULT_MAXFVAL_UB: f64 = 1e5;

/// Default SIS-selected subspace size, applied to every dimension.
pub const DEFAULT_SUBS_SIS: usize = 20;

/// Default number of features kept by L1 screening for the final L0 search.
pub const DEFAULT_L1L0_SIZE4L0: usize = 1;

/// Default number of best models written for each dimension.
pub const DEFAULT_NM_OUTPUT: usize = 100;

/// Default boundary tolerance of convex domains (classification only).
pub const DEFAULT_WIDTH: f64 = 1e-3;

/// Number of `!` characters in banner rules of `SISSO.in`.
pub const BANNER_WIDTH: usize = 70;

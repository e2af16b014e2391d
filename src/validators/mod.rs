//! Post-run checks of SISSO output artifacts.
//!
//! A validator answers one question after (or while) SISSO runs: does the
//! run still need attention? Validators only read files and never raise on
//! missing artifacts, so they can be polled right after process launch.

pub mod completion;

pub use completion::{CompletionStatus, NormalCompletionValidator};

/// A check over the artifacts of a SISSO run.
pub trait Validator {
    /// Short name used in log messages.
    fn name(&self) -> &str;

    /// `true` when the run is incomplete or failed.
    fn check(&self) -> bool;
}

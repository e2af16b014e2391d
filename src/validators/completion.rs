//! Normal completion of a SISSO run.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use super::Validator;
use crate::core::constants::{
    COMPLETION_MARKER, DEFAULT_OUTPUT_FILE, DEFAULT_STDERR_FILE, DEFAULT_STDOUT_FILE,
};

/// Outcome of a completion check, first failing condition wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStatus {
    /// All artifacts look like a finished run
    Normal,
    /// Primary output file does not exist
    MissingOutput,
    /// Stdout file does not exist
    MissingStdout,
    /// Stdout file is empty
    EmptyStdout,
    /// Stderr file exists and is not empty
    StderrNotEmpty,
    /// Completion marker not found in the primary output
    MarkerNotFound,
}

impl CompletionStatus {
    pub fn is_normal(self) -> bool {
        self == CompletionStatus::Normal
    }
}

impl fmt::Display for CompletionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            CompletionStatus::Normal => "normal completion",
            CompletionStatus::MissingOutput => "output file missing",
            CompletionStatus::MissingStdout => "stdout file missing",
            CompletionStatus::EmptyStdout => "stdout file empty",
            CompletionStatus::StderrNotEmpty => "stderr file not empty",
            CompletionStatus::MarkerNotFound => "completion marker not found",
        };
        f.write_str(text)
    }
}

/// Checks that SISSO finished normally.
///
/// A run is complete when the output file exists and contains the
/// completion marker, stdout exists and is not empty, and stderr is absent
/// or empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalCompletionValidator {
    output_file: PathBuf,
    stdout_file: PathBuf,
    stderr_file: PathBuf,
}

impl NormalCompletionValidator {
    /// Validator over explicitly named artifacts.
    pub fn new<O, S, E>(output_file: O, stdout_file: S, stderr_file: E) -> Self
    where
        O: Into<PathBuf>,
        S: Into<PathBuf>,
        E: Into<PathBuf>,
    {
        NormalCompletionValidator {
            output_file: output_file.into(),
            stdout_file: stdout_file.into(),
            stderr_file: stderr_file.into(),
        }
    }

    /// Validator over the default artifact names inside `directory`.
    pub fn in_directory<P: AsRef<Path>>(directory: P) -> Self {
        let directory = directory.as_ref();
        Self::new(
            directory.join(DEFAULT_OUTPUT_FILE),
            directory.join(DEFAULT_STDOUT_FILE),
            directory.join(DEFAULT_STDERR_FILE),
        )
    }

    /// Path of the SISSO output file.
    pub fn output_file(&self) -> &Path {
        &self.output_file
    }

    /// Path of the captured stdout.
    pub fn stdout_file(&self) -> &Path {
        &self.stdout_file
    }

    /// Path of the captured stderr.
    pub fn stderr_file(&self) -> &Path {
        &self.stderr_file
    }

    /// Evaluate every condition and report the first one that fails.
    pub fn assess(&self) -> CompletionStatus {
        if !self.output_file.is_file() {
            return CompletionStatus::MissingOutput;
        }
        match fs::metadata(&self.stdout_file) {
            Ok(meta) if !meta.is_file() => return CompletionStatus::MissingStdout,
            Ok(meta) if meta.len() == 0 => return CompletionStatus::EmptyStdout,
            Ok(_) => {}
            Err(_) => return CompletionStatus::MissingStdout,
        }
        // Only a regular file counts as stderr output
        if let Ok(meta) = fs::metadata(&self.stderr_file) {
            if meta.is_file() && meta.len() > 0 {
                return CompletionStatus::StderrNotEmpty;
            }
        }
        match fs::read(&self.output_file) {
            Ok(content) if contains_marker(&content) => CompletionStatus::Normal,
            _ => CompletionStatus::MarkerNotFound,
        }
    }
}

impl Default for NormalCompletionValidator {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_FILE, DEFAULT_STDOUT_FILE, DEFAULT_STDERR_FILE)
    }
}

impl Validator for NormalCompletionValidator {
    fn name(&self) -> &str {
        "normal-completion"
    }

    fn check(&self) -> bool {
        let status = self.assess();
        if !status.is_normal() {
            log::debug!("{}: {} ({})", self.name(), status, self.output_file.display());
        }
        !status.is_normal()
    }
}

// The marker is written last, so search from the end.
fn contains_marker(content: &[u8]) -> bool {
    content
        .windows(COMPLETION_MARKER.len())
        .rev()
        .any(|window| window == COMPLETION_MARKER)
}

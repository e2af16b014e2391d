//! Integration tests for run completion checks.

mod common;

use common::write_file;
use sisso_prep::*;
use tempfile::TempDir;

const FINISHED_OUTPUT: &str = "\
Final model/descriptor !
================================================================================
  2D descriptor (model):
 Total time (second):     12.34
 Have a nice day !
";

#[test]
fn test_finished_run() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "SISSO.out", FINISHED_OUTPUT);
    write_file(dir.path(), "SISSO.log", "SISSO started\n");

    let validator = NormalCompletionValidator::in_directory(dir.path());
    assert!(!validator.check());
    assert_eq!(validator.assess(), CompletionStatus::Normal);
    assert_eq!(validator.name(), "normal-completion");
}

#[test]
fn test_run_still_in_progress() {
    let dir = TempDir::new().unwrap();
    let validator = NormalCompletionValidator::in_directory(dir.path());
    assert!(validator.check());

    write_file(dir.path(), "SISSO.out", "Feature construction (FC) starts ...\n");
    write_file(dir.path(), "SISSO.log", "running\n");
    assert_eq!(validator.assess(), CompletionStatus::MarkerNotFound);
    assert!(validator.check());
}

#[test]
fn test_stderr_output_fails_run() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "SISSO.out", FINISHED_OUTPUT);
    write_file(dir.path(), "SISSO.log", "SISSO started\n");
    write_file(dir.path(), "SISSO.err", "forrtl: severe (174): SIGSEGV\n");

    let validator = NormalCompletionValidator::in_directory(dir.path());
    assert_eq!(validator.assess(), CompletionStatus::StderrNotEmpty);
    assert!(validator.check());
}

#[test]
fn test_custom_artifact_names() {
    let dir = TempDir::new().unwrap();
    let out = write_file(dir.path(), "run.out", FINISHED_OUTPUT);
    let log = write_file(dir.path(), "run.log", "");
    let validator = NormalCompletionValidator::new(out, &log, dir.path().join("run.err"));
    assert_eq!(validator.assess(), CompletionStatus::EmptyStdout);

    write_file(dir.path(), "run.log", "done\n");
    assert!(!validator.check());
}

#[test]
fn test_validator_as_trait_object() {
    let dir = TempDir::new().unwrap();
    let validators: Vec<Box<dyn Validator>> =
        vec![Box::new(NormalCompletionValidator::in_directory(dir.path()))];
    assert!(validators.iter().all(|v| v.check()));
}

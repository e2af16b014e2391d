//! Core infrastructure shared by every other module.
//!
//! - [`types`]: keyword enumerations and the dynamically typed [`KeywordValue`]
//! - [`constants`]: file names, reserved literals and keyword defaults
//! - [`error`]: the crate error type and `Result` alias

pub mod constants;
pub mod error;
pub mod types;

pub use constants::*;
pub use error::{Result, SissoError};
pub use types::*;

/// Version information for the crate
pub const CORE_MODULE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the logging subsystem.
///
/// Defaults the filter to `info` unless `RUST_LOG` is set. Calling it more
/// than once is harmless.
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    // Ignore the error raised when a logger is already installed
    let _ = env_logger::Builder::from_env(env).try_init();
}

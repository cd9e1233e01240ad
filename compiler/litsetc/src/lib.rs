//! Driver for literal-set checking.
//!
//! A [`Session`] owns the interner, the shared set cache and the check
//! configuration. Files handed to it are parsed in parallel, their sets
//! are built into the cache bases first, and then every file is checked
//! in parallel against the finished cache. The cache outlives a single
//! call, so a file checked later can use sets built earlier, and it can be
//! written to disk and loaded by a later session.

mod error;
mod render;
mod session;
mod trace;

pub use error::SessionError;
pub use render::{render, OutputFormat};
pub use session::{module_path, Session, SourceFile};
pub use trace::init_tracing;

pub use litset_check::{CheckConfig, CheckedModule};
pub use litset_diagnostic::emitter::ColorMode;

/// Check `files` in a fresh session built from `config`.
pub fn check_files(files: &[SourceFile], config: CheckConfig) -> Vec<CheckedModule> {
    Session::new(config).check_files(files)
}

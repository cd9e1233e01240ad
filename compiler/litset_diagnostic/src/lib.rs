//! Diagnostic system for literal-set analysis.
//!
//! Every user-facing problem is a `Diagnostic`: an `ErrorCode` for
//! searchability, a message saying what went wrong, labelled spans saying
//! where, and notes/suggestions saying how to fix it.
//!
//! `ErrorGuaranteed` is type-level proof that an error was emitted; it can
//! only be obtained from a `DiagnosticQueue`.

mod diagnostic;
pub mod emitter;
mod error_code;
mod guarantee;
pub mod queue;
pub mod span_utils;

pub use diagnostic::{
    expected_expression, expected_identifier, unclosed_delimiter, unexpected_token, Diagnostic,
    Label, Severity,
};
pub use error_code::ErrorCode;
pub use guarantee::ErrorGuaranteed;
pub use queue::{DiagnosticConfig, DiagnosticQueue};

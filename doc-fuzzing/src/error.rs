// doc-fuzzing/src/error.rs
//! Errors surfaced by the engine.
//!
//! A type without mutators or a random pick over nothing is not an error: the
//! engine absorbs both into a `NoOp` log entry so one empty field never aborts
//! a whole-document run.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FuzzError {
    /// No factory could build a default instance of the type. This means the
    /// catalog and the schema disagree, so it is always fatal.
    #[error("cannot synthesize a default instance of {type_name}")]
    SynthesisFailure { type_name: &'static str },

    #[error("invalid generator pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

pub type Result<T> = std::result::Result<T, FuzzError>;

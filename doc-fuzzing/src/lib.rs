// doc-fuzzing/src/lib.rs
//! Structural fuzzing for typed document graphs.
//!
//! A [`MutatorCatalog`] maps each node type to a list of candidate
//! mutators. The [`MutationEngine`] picks one per visited node, recursing
//! into sub-elements, choice elements and contained sub-documents, and
//! returns a [`LogEntry`] tree describing every change it made.

pub mod constants;
pub mod utils;

// Core modules
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod primitive;
pub mod provenance;
pub mod random;

pub mod mutators;
pub mod reporters;

// Re-exports for convenience
pub use catalog::{MutatorCatalog, MutatorEntry};
pub use config::FuzzConfig;
pub use engine::{FuzzContext, Limits, MutationEngine};
pub use error::{FuzzError, Result};
pub use primitive::{Corruption, Fuzzed, PrimitiveFuzzer, PrimitiveHint};
pub use provenance::{LogEntry, LogSummary};
pub use random::RandomSource;

use tracing::info;

/// Initialize the fuzzing infrastructure
///
/// Reads the run configuration from the environment. Should be called at the
/// start of each fuzzing binary, after the logger is installed.
pub fn init() -> FuzzConfig {
    let config = FuzzConfig::from_env();
    info!(
        "document fuzzing: mode {}, seed {}, max depth {}, embed probability {}",
        config.mode, config.seed, config.max_depth, config.embed_probability
    );
    if config.is_debug() {
        info!("debug mode: every log tree is printed");
    }
    config
}

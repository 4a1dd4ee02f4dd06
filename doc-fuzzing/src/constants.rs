// doc-fuzzing/src/constants.rs
//! Shared constants for the fuzzing engine

/// Maximum nesting depth the engine will recurse into before giving up on a branch
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// Chance that the embed mutator attaches a new sub-document when selected
pub const DEFAULT_EMBED_PROBABILITY: f64 = 0.25;

/// Seed used when none is configured
pub const DEFAULT_SEED: u64 = 42;

/// Maximum number of fuzz passes for a run
pub const MAX_ITERATIONS: usize = 10000;

/// Default artifact directory
pub const DEFAULT_ARTIFACT_DIR: &str = "./fuzzing-artifacts";

/// Target lengths used by the boundary-length strategy
pub const BOUNDARY_LENGTHS: &[usize] = &[1, 2, 63, 64, 65, 255, 256, 1024, 4096, 65536];

/// Number of characters of a value shown in log entries
pub const LOG_PREVIEW_CHARS: usize = 24;

/// Shapes used to synthesize values for absent primitives
pub mod patterns {
    /// Logical identity
    pub const IDENTIFIER: &str = r"[A-Za-z0-9\-\.]{1,64}";
    /// Absolute URI
    pub const URI: &str = r"https?://[a-z]{3,12}\.(org|com|net)(/[a-z0-9]{1,12}){0,3}";
    /// Token from a code system
    pub const CODE: &str = r"[a-z][a-z0-9\-]{1,15}";
}

/// Fuzzing modes
pub mod modes {
    /// Standard fuzzing mode
    pub const STANDARD: &str = "standard";
    /// Quick fuzzing mode (fewer iterations)
    pub const QUICK: &str = "quick";
    /// Thorough fuzzing mode (more iterations, deeper recursion)
    pub const THOROUGH: &str = "thorough";
    /// CI mode (optimized for continuous integration)
    pub const CI: &str = "ci";
    /// Debug mode (extra logging)
    pub const DEBUG: &str = "debug";
}

// doc-fuzzing/src/config.rs
//! Run configuration

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::utils;

/// Settings for a fuzzing run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzConfig {
    /// One of [`constants::modes`]
    pub mode: String,
    pub seed: u64,
    /// Number of whole-document passes
    pub iterations: usize,
    /// Recursion limit for nested sub-elements and embedded sub-documents
    pub max_depth: usize,
    /// Chance that the embed mutator attaches a new sub-document
    pub embed_probability: f64,
}

impl Default for FuzzConfig {
    fn default() -> Self {
        Self {
            mode: constants::modes::STANDARD.to_string(),
            seed: constants::DEFAULT_SEED,
            iterations: constants::MAX_ITERATIONS,
            max_depth: constants::DEFAULT_MAX_DEPTH,
            embed_probability: constants::DEFAULT_EMBED_PROBABILITY,
        }
    }
}

impl FuzzConfig {
    /// Read `DOC_FUZZING_*` environment variables, falling back to the
    /// defaults of the configured mode.
    pub fn from_env() -> Self {
        Self {
            mode: utils::get_fuzzing_mode(),
            seed: utils::get_seed(),
            iterations: utils::get_max_iterations(),
            max_depth: utils::get_max_depth(),
            embed_probability: utils::get_embed_probability(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_embed_probability(mut self, probability: f64) -> Self {
        self.embed_probability = probability.clamp(0.0, 1.0);
        self
    }

    pub fn is_debug(&self) -> bool {
        self.mode == constants::modes::DEBUG
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders_clamp_probability() {
        let config = FuzzConfig::default()
            .with_seed(9)
            .with_iterations(3)
            .with_max_depth(2)
            .with_embed_probability(4.0);
        assert_eq!(config.seed, 9);
        assert_eq!(config.iterations, 3);
        assert_eq!(config.max_depth, 2);
        assert_eq!(config.embed_probability, 1.0);
        assert!(!config.is_debug());
    }
}

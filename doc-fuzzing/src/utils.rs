// doc-fuzzing/src/utils.rs
//! Utility functions for the fuzzing engine

use crate::constants;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Get the fuzzing mode from environment or default to standard
pub fn get_fuzzing_mode() -> String {
    env::var("DOC_FUZZING_MODE").unwrap_or_else(|_| constants::modes::STANDARD.to_string())
}

/// Get the seed from environment or the default seed
pub fn get_seed() -> u64 {
    env::var("DOC_FUZZING_SEED")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(constants::DEFAULT_SEED)
}

/// Get the maximum iterations based on mode
pub fn get_max_iterations() -> usize {
    let mode = get_fuzzing_mode();
    let default_iterations = match mode.as_str() {
        constants::modes::QUICK => 100,
        constants::modes::THOROUGH => 50000,
        constants::modes::CI => 1000,
        _ => constants::MAX_ITERATIONS,
    };

    env::var("DOC_FUZZING_MAX_ITERATIONS")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(default_iterations)
}

/// Get the recursion limit based on mode
pub fn get_max_depth() -> usize {
    let mode = get_fuzzing_mode();
    let default_depth = match mode.as_str() {
        constants::modes::QUICK => constants::DEFAULT_MAX_DEPTH / 2,
        constants::modes::THOROUGH => constants::DEFAULT_MAX_DEPTH * 2,
        _ => constants::DEFAULT_MAX_DEPTH,
    };

    env::var("DOC_FUZZING_MAX_DEPTH")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(default_depth)
}

/// Get the embed probability, clamped to `[0, 1]`
pub fn get_embed_probability() -> f64 {
    env::var("DOC_FUZZING_EMBED_PROBABILITY")
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|p| p.is_finite())
        .map(|p| p.clamp(0.0, 1.0))
        .unwrap_or(constants::DEFAULT_EMBED_PROBABILITY)
}

/// Get the artifacts directory path, creating it if needed
pub fn get_artifacts_dir(target: &str) -> std::io::Result<PathBuf> {
    let base_dir = env::var("DOC_FUZZING_ARTIFACTS_DIR")
        .unwrap_or_else(|_| constants::DEFAULT_ARTIFACT_DIR.to_string());

    let path = Path::new(&base_dir).join(target);
    if !path.exists() {
        fs::create_dir_all(&path)?;
    }

    Ok(path)
}

/// Get a timestamp string for file naming
pub fn get_timestamp_string() -> String {
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_secs();

    format!("{}", now)
}

/// Create a unique file name with timestamp
pub fn create_timestamped_filename(prefix: &str, extension: &str) -> String {
    format!("{}_{}.{}", prefix, get_timestamp_string(), extension)
}

/// Shorten a value for log output, counting characters rather than bytes
pub fn preview(value: &str) -> String {
    let mut chars = value.chars();
    let head: String = chars.by_ref().take(constants::LOG_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{:?}...", head)
    } else {
        format!("{:?}", head)
    }
}

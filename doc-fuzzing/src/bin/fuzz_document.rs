// doc-fuzzing/src/bin/fuzz_document.rs
//! Document fuzzer

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use doc_fuzzing::mutators::standard_catalog;
use doc_fuzzing::reporters::{self, RunRecorder};
use doc_fuzzing::{utils, MutationEngine, RandomSource};
use doc_types::{Embedded, Resource};
use log::{debug, error, info};

/// Structural document fuzzer CLI
#[derive(Parser, Debug)]
#[clap(author, version, about = "Structural fuzzer for typed documents")]
struct Cli {
    /// Resource type to start from when no input document is given
    #[clap(short, long, default_value = "Patient")]
    resource: String,

    /// JSON document to fuzz instead of a default instance
    #[clap(short = 'f', long)]
    input: Option<PathBuf>,

    /// Number of whole-document passes (defaults to DOC_FUZZING_MAX_ITERATIONS)
    #[clap(short, long)]
    iterations: Option<usize>,

    /// Random seed (defaults to DOC_FUZZING_SEED)
    #[clap(short, long)]
    seed: Option<u64>,

    /// Recursion limit for nested elements
    #[clap(short = 'd', long)]
    max_depth: Option<usize>,

    /// Chance of embedding a new contained resource
    #[clap(short, long)]
    embed_probability: Option<f64>,

    /// Apply a single mutator per iteration instead of a random subset
    #[clap(long)]
    once: bool,

    /// Directory for run reports (defaults to DOC_FUZZING_ARTIFACTS_DIR)
    #[clap(short, long)]
    artifacts: Option<PathBuf>,

    /// Write the mutated document here when the run completes
    #[clap(short, long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = doc_fuzzing::init();
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    if let Some(iterations) = cli.iterations {
        config = config.with_iterations(iterations);
    }
    if let Some(max_depth) = cli.max_depth {
        config = config.with_max_depth(max_depth);
    }
    if let Some(probability) = cli.embed_probability {
        config = config.with_embed_probability(probability);
    }

    let mut document = load_document(&cli)?;
    let target = document.resource_type();
    let artifacts = match &cli.artifacts {
        Some(dir) => dir.clone(),
        None => utils::get_artifacts_dir(target).context("failed to create artifacts directory")?,
    };
    info!(
        "fuzzing {} for {} iterations with seed {}",
        target, config.iterations, config.seed
    );

    let engine = MutationEngine::with_config(standard_catalog(), &config);
    let mut ctx = engine.context(RandomSource::seeded(config.seed));
    let mut recorder = RunRecorder::new(target, &config);

    for iteration in 0..config.iterations {
        let result = if cli.once {
            ctx.fuzz_once(&mut document)
        } else {
            ctx.fuzz_pass(&mut document)
        };

        match result {
            Ok(log) if config.is_debug() => {
                println!("iteration {}:\n{}", iteration, log);
                recorder.record(log);
            }
            Ok(log) => {
                debug!("iteration {}:\n{}", iteration, log);
                recorder.record(log);
            }
            Err(err) => {
                error!("iteration {} failed: {}", iteration, err);
                let snapshot = serde_json::to_string_pretty(&document)?;
                let path = reporters::save_failure(target, &snapshot, &err, &artifacts)?;
                bail!("fuzzing stopped at iteration {}: {} (document saved to {})", iteration, err, path.display());
            }
        }

        if iteration > 0 && iteration % 1000 == 0 {
            info!("iteration {}/{}", iteration, config.iterations);
        }
    }

    let report = recorder.finish();
    reporters::report_run(&report);
    let path = reporters::save_report(&report, &artifacts)?;
    println!("\nReport saved to {}", path.display());

    if let Some(output) = &cli.output {
        fs::write(output, serde_json::to_string_pretty(&document)?)
            .with_context(|| format!("failed to write {}", output.display()))?;
        println!("Mutated document saved to {}", output.display());
    }

    info!("document fuzzing complete");
    Ok(())
}

fn load_document(cli: &Cli) -> anyhow::Result<Resource> {
    if let Some(path) = &cli.input {
        let raw = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        let document = serde_json::from_str(&raw).with_context(|| format!("{} is not a known resource", path.display()))?;
        return Ok(document);
    }

    match Resource::default_of(&cli.resource) {
        Some(document) => Ok(document),
        None => bail!(
            "unknown resource type {} (expected one of {})",
            cli.resource,
            Resource::kinds().join(", ")
        ),
    }
}

// doc-fuzzing/src/reporters/mod.rs
//! Run summaries and the JSON audit trail of a fuzzing run

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::FuzzConfig;
use crate::provenance::{LogEntry, LogSummary};
use crate::utils;

/// The log tree produced by one whole-document pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationRecord {
    pub iteration: usize,
    pub changed: bool,
    pub log: LogEntry,
}

/// Everything needed to reproduce and audit a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub target: String,
    pub mode: String,
    pub seed: u64,
    pub max_depth: usize,
    pub embed_probability: f64,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u128,
    pub summary: LogSummary,
    pub max_log_depth: usize,
    pub changed_iterations: usize,
    pub iterations: Vec<IterationRecord>,
}

impl RunReport {
    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms.min(u64::MAX as u128) as u64)
    }
}

/// Collects iteration logs while a run is in progress
pub struct RunRecorder {
    target: String,
    config: FuzzConfig,
    started: Instant,
    started_at: DateTime<Utc>,
    iterations: Vec<IterationRecord>,
}

impl RunRecorder {
    pub fn new(target: impl Into<String>, config: &FuzzConfig) -> Self {
        Self {
            target: target.into(),
            config: config.clone(),
            started: Instant::now(),
            started_at: Utc::now(),
            iterations: Vec::new(),
        }
    }

    pub fn record(&mut self, log: LogEntry) {
        let iteration = self.iterations.len();
        self.iterations.push(IterationRecord {
            iteration,
            changed: log.changed(),
            log,
        });
    }

    pub fn len(&self) -> usize {
        self.iterations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.iterations.is_empty()
    }

    pub fn finish(self) -> RunReport {
        let mut summary = LogSummary::default();
        for record in &self.iterations {
            summary += record.log.summary();
        }
        let max_log_depth = self
            .iterations
            .iter()
            .map(|record| record.log.depth())
            .max()
            .unwrap_or(0);
        let changed_iterations = self.iterations.iter().filter(|record| record.changed).count();

        RunReport {
            target: self.target,
            mode: self.config.mode,
            seed: self.config.seed,
            max_depth: self.config.max_depth,
            embed_probability: self.config.embed_probability,
            started_at: self.started_at,
            elapsed_ms: self.started.elapsed().as_millis(),
            summary,
            max_log_depth,
            changed_iterations,
            iterations: self.iterations,
        }
    }
}

/// Print a human-readable summary of a run
pub fn report_run(report: &RunReport) {
    println!("\n=== Document Fuzzing Results: {} ===", report.target);
    println!("Mode: {}", report.mode);
    println!("Seed: {}", report.seed);
    println!("Started: {}", report.started_at.to_rfc3339());
    println!("Elapsed: {}", humantime::format_duration(report.elapsed()));
    println!("Iterations: {}", report.iterations.len());
    println!("Iterations that changed the document: {}", report.changed_iterations);

    println!("\nLog entries:");
    println!("  operations: {}", report.summary.operations);
    println!("  additions: {}", report.summary.additions);
    println!("  no-ops: {}", report.summary.no_ops);
    println!("  recursive steps: {}", report.summary.parents);
    println!("  deepest log tree: {}", report.max_log_depth);
}

/// Write the report as JSON into `dir`, returning the file path
pub fn save_report(report: &RunReport, dir: &Path) -> io::Result<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    let path = dir.join(utils::create_timestamped_filename(&report.target, "json"));
    let file = File::create(&path)?;
    serde_json::to_writer_pretty(file, report)?;

    info!("run report saved to {}", path.display());
    Ok(path)
}

/// Keep the document that was being fuzzed when a run failed
pub fn save_failure(target: &str, document: &str, error: &dyn std::fmt::Display, dir: &Path) -> io::Result<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    let path = dir.join(utils::create_timestamped_filename(&format!("{}_failure", target), "txt"));
    let mut file = File::create(&path)?;
    writeln!(file, "=== Document Fuzzing Failure: {} ===", target)?;
    writeln!(file, "Error: {}", error)?;
    writeln!(file, "\nDocument:\n{}", document)?;

    info!("failure saved to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("doc-fuzzing-{}-{}", name, uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_finish_aggregates_iterations() {
        let config = FuzzConfig::default().with_seed(5);
        let mut recorder = RunRecorder::new("Patient", &config);
        recorder.record(LogEntry::parent(
            "Patient",
            vec![LogEntry::parent("Patient.name[0]", vec![LogEntry::operation("x")])],
        ));
        recorder.record(LogEntry::no_op("nothing selected"));
        assert_eq!(recorder.len(), 2);

        let report = recorder.finish();
        assert_eq!(report.seed, 5);
        assert_eq!(report.changed_iterations, 1);
        assert_eq!(report.max_log_depth, 3);
        assert_eq!(report.summary.operations, 1);
        assert_eq!(report.summary.no_ops, 1);
        assert_eq!(report.summary.parents, 2);
        assert_eq!(report.iterations[1].iteration, 1);
    }

    #[test]
    fn test_save_report_writes_json() {
        let dir = temp_dir("report");
        let mut recorder = RunRecorder::new("Observation", &FuzzConfig::default());
        recorder.record(LogEntry::operation("Observation.status: final -> amended"));
        let report = recorder.finish();

        let path = save_report(&report, &dir).unwrap();
        let json: serde_json::Value = serde_json::from_reader(File::open(&path).unwrap()).unwrap();
        assert_eq!(json["target"], "Observation");
        assert_eq!(json["iterations"][0]["log"]["kind"], "operation");

        let path = save_failure("Observation", "{}", &"boom", &dir).unwrap();
        let text = fs::read_to_string(path).unwrap();
        assert!(text.contains("Error: boom"));
        fs::remove_dir_all(dir).unwrap();
    }
}

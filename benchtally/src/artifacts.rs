//! Result-artifact parsing: summary files, sample logs, and the
//! filename conventions that tie them together.
//!
//! The evaluation harness writes one summary JSON per run, named
//! `results_<model>_<timestamp>.json`, and (when invoked with sample
//! logging) one newline-delimited JSON log per task named
//! `samples_<task>_<timestamp>.jsonl` in the same directory. The model
//! name and run timestamp exist only in those filenames; nothing inside
//! the files repeats them reliably across harness versions.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use glob::glob;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// Matches `results_<model>_<timestamp>.json`. The timestamp keeps the
/// sub-second precision the harness emits so sample-log paths can be
/// derived from it exactly.
static SUMMARY_FILE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^results_(?P<model>.+)_(?P<ts>\d{4}-\d{2}-\d{2}T\d{2}-\d{2}-\d{2}(?:\.\d+)?)\.json$",
    )
    .expect("summary filename regex is valid")
});

/// Identity of one benchmark run, parsed from a summary filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRun {
    /// Model name as embedded in the filename.
    pub model_name: String,
    /// Run timestamp as embedded in the filename (kept verbatim).
    pub run_timestamp: String,
    /// Path of the summary file this run was parsed from.
    pub source_path: PathBuf,
}

impl ModelRun {
    /// Parse a run identity out of a summary file path.
    ///
    /// Returns `None` when the filename does not follow the
    /// `results_<model>_<timestamp>.json` convention.
    #[must_use]
    pub fn from_summary_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        let caps = SUMMARY_FILE.captures(name)?;
        Some(ModelRun {
            model_name: caps["model"].to_string(),
            run_timestamp: caps["ts"].to_string(),
            source_path: path.to_path_buf(),
        })
    }

    /// Derive the co-located sample-log path for one task: the task id
    /// replaces the model name and the full-precision timestamp is kept.
    #[must_use]
    pub fn sample_log_path(&self, task_id: &str) -> PathBuf {
        let dir = self.source_path.parent().unwrap_or_else(|| Path::new(""));
        dir.join(format!("samples_{}_{}.jsonl", task_id, self.run_timestamp))
    }
}

/// Per-task sample counts from the summary's `n-samples` block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SampleCounts {
    /// Dataset size before any limit.
    #[serde(default)]
    pub original: Option<u64>,
    /// Number of examples actually evaluated (post limit).
    #[serde(default)]
    pub effective: Option<u64>,
}

/// The harness `config` block. Only `limit` is of interest; the rest of
/// the block varies per harness version and is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunConfig {
    /// Configured example limit: an integer, `"none"`, or absent.
    #[serde(default)]
    pub limit: Option<Value>,
}

impl RunConfig {
    /// The configured example limit, when one is in effect. The harness
    /// writes `"none"` (or omits the field) for unlimited runs.
    #[must_use]
    pub fn limit(&self) -> Option<u64> {
        self.limit.as_ref().and_then(Value::as_u64)
    }
}

/// One parsed summary file.
///
/// The per-task metric mapping stays schemaless (`String -> Value`)
/// because the harness has renamed its metric keys across versions;
/// resolution through the alias list happens in [`crate::metrics`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryFile {
    /// Task id -> metric key -> value.
    #[serde(default)]
    pub results: HashMap<String, HashMap<String, Value>>,
    /// Task id -> sample counts.
    #[serde(rename = "n-samples", default)]
    pub n_samples: HashMap<String, SampleCounts>,
    /// Harness run configuration.
    #[serde(default)]
    pub config: RunConfig,
}

impl SummaryFile {
    /// Load and parse a summary file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        serde_json::from_str(&json)
            .map_err(|e| Error::parse(format!("{}: {}", path.display(), e)))
    }

    /// Task ids present in this summary, sorted lexicographically.
    #[must_use]
    pub fn task_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.results.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Effective sample count for a task, 0 when unreported.
    #[must_use]
    pub fn effective_samples(&self, task_id: &str) -> u64 {
        self.n_samples
            .get(task_id)
            .and_then(|c| c.effective)
            .unwrap_or(0)
    }
}

/// One line of a per-task sample log.
///
/// Only the two fields the classifier needs are modeled; each log line
/// carries much more (prompt, raw responses, per-metric details) that
/// aggregation never reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SampleRecord {
    /// Post-filter extractions, one per repeat. The extraction filter
    /// emits an empty/null entry when it could not find an answer.
    #[serde(default)]
    pub filtered_resps: Option<Value>,
    /// Exact-match score for this example, if scored.
    #[serde(default)]
    pub exact_match: Option<f64>,
}

/// Discover all summary files under a results directory, recursively.
///
/// Returns runs sorted by source path so downstream report ordering is
/// deterministic regardless of filesystem iteration order.
pub fn discover_runs(results_dir: &Path) -> Result<Vec<ModelRun>> {
    // The directory part is literal; brackets or stars in a path
    // component must not act as glob syntax.
    let dir = glob::Pattern::escape(&results_dir.display().to_string());
    let pattern = format!("{}/**/results_*.json", dir);
    let paths = glob(&pattern).map_err(|e| Error::discovery(e.to_string()))?;

    let mut runs: Vec<ModelRun> = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) => {
                if let Some(run) = ModelRun::from_summary_path(&path) {
                    runs.push(run);
                }
            }
            Err(e) => return Err(Error::discovery(e.to_string())),
        }
    }
    runs.sort_by(|a, b| a.source_path.cmp(&b.source_path));
    Ok(runs)
}

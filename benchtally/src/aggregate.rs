//! Folding verdicts into per-task and per-model counters.
//!
//! Rates are always computed sum-then-divide over counters, never by
//! averaging per-task rates: tasks carry different sample counts and a
//! model total must weight by samples, not by task count.

use std::path::PathBuf;

use crate::artifacts::{self, ModelRun, SummaryFile};
use crate::classify::{self, Verdict};
use crate::error::{Error, Result};
use crate::metrics::MetricAliases;

/// Per-(run, task) verdict counters.
///
/// The total is derived, so `correct + wrong + invalid == total` holds
/// by construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    /// Scored examples with a matching answer.
    pub correct: u64,
    /// Scored examples with a non-matching answer.
    pub wrong: u64,
    /// Examples whose extraction was empty and could not be scored.
    pub invalid: u64,
}

impl TaskStats {
    /// Total classified examples.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.correct + self.wrong + self.invalid
    }

    /// Count one verdict.
    pub fn add(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Correct => self.correct += 1,
            Verdict::Wrong => self.wrong += 1,
            Verdict::Invalid => self.invalid += 1,
        }
    }

    /// Merge another counter set into this one.
    pub fn merge(&mut self, other: &TaskStats) {
        self.correct += other.correct;
        self.wrong += other.wrong;
        self.invalid += other.invalid;
    }

    /// `correct / total`, counting invalid responses as incorrect.
    /// 0 when nothing was classified.
    #[must_use]
    pub fn raw_accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.correct as f64 / total as f64
        }
    }

    /// `correct / (correct + wrong)`, excluding invalid responses from
    /// the denominator. `None` when no response could be scored at all;
    /// that is not the same thing as 0.
    #[must_use]
    pub fn valid_accuracy(&self) -> Option<f64> {
        let scored = self.correct + self.wrong;
        if scored == 0 {
            None
        } else {
            Some(self.correct as f64 / scored as f64)
        }
    }

    /// `invalid / total`; 0 when nothing was classified.
    #[must_use]
    pub fn invalid_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.invalid as f64 / total as f64
        }
    }
}

/// Where a task's counters came from. Fallback-derived numbers carry a
/// documented approximation (invalid assumed 0) and must stay
/// distinguishable from log-derived ones all the way into the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsSource {
    /// Counted from a per-example sample log.
    SampleLog,
    /// Estimated from the published metric; invalid assumed 0.
    Estimated,
    /// No metric resolvable and no sample log; excluded from every
    /// rate denominator.
    Unscored,
}

/// Counters for one task of one run, with their provenance.
#[derive(Debug, Clone)]
pub struct TaskReport {
    /// Task identifier as published by the harness.
    pub task_id: String,
    /// Verdict counters.
    pub stats: TaskStats,
    /// Provenance of the counters.
    pub source: StatsSource,
}

/// All task counters for one model run.
#[derive(Debug, Clone)]
pub struct ModelReport {
    /// Run identity.
    pub run: ModelRun,
    /// Example limit the harness ran with, when one was configured.
    pub limit: Option<u64>,
    /// Per-task counters, sorted by task id.
    pub tasks: Vec<TaskReport>,
}

impl ModelReport {
    /// Sum of all task counters. Unscored tasks hold zero counters and
    /// therefore drop out of every rate this produces.
    #[must_use]
    pub fn overall(&self) -> TaskStats {
        let mut total = TaskStats::default();
        for task in &self.tasks {
            total.merge(&task.stats);
        }
        total
    }

    /// Look up one task's counters.
    #[must_use]
    pub fn task(&self, task_id: &str) -> Option<&TaskReport> {
        self.tasks.iter().find(|t| t.task_id == task_id)
    }
}

/// Shared aggregation context: where to look, how to resolve metric
/// keys, and how chatty to be. Passed explicitly instead of living in
/// process-wide state.
#[derive(Debug, Clone)]
pub struct AggregateConfig {
    /// Directory scanned for result artifacts.
    pub results_dir: PathBuf,
    /// Metric-key alias order.
    pub aliases: MetricAliases,
    /// Suppress skip diagnostics on stderr.
    pub quiet: bool,
}

impl AggregateConfig {
    /// Context with default aliases and diagnostics enabled.
    #[must_use]
    pub fn new(results_dir: impl Into<PathBuf>) -> Self {
        AggregateConfig {
            results_dir: results_dir.into(),
            aliases: MetricAliases::default(),
            quiet: false,
        }
    }
}

fn diag(quiet: bool, msg: &str) {
    if !quiet {
        eprintln!("{}", msg);
    }
}

/// Aggregate every discoverable run under the results directory.
///
/// Unreadable or unparsable summary files are skipped with a
/// diagnostic; the run continues with the rest. Finding no usable run
/// at all is fatal: an empty report must not look like a successful
/// one.
pub fn aggregate_results(config: &AggregateConfig) -> Result<Vec<ModelReport>> {
    let runs = artifacts::discover_runs(&config.results_dir)?;
    if runs.is_empty() {
        return Err(Error::NoResults(config.results_dir.display().to_string()));
    }

    let mut reports = Vec::with_capacity(runs.len());
    for run in runs {
        match SummaryFile::load(&run.source_path) {
            Ok(summary) => reports.push(aggregate_run(config, run, &summary)),
            Err(e) => diag(
                config.quiet,
                &format!("warning: skipping {}: {}", run.source_path.display(), e),
            ),
        }
    }

    if reports.is_empty() {
        return Err(Error::NoResults(config.results_dir.display().to_string()));
    }
    Ok(reports)
}

/// Aggregate one parsed summary into per-task counters.
///
/// For each task: classify the co-located sample log when one exists,
/// otherwise estimate from the resolved metric, otherwise report the
/// task as unscored.
pub fn aggregate_run(
    config: &AggregateConfig,
    run: ModelRun,
    summary: &SummaryFile,
) -> ModelReport {
    let mut tasks = Vec::new();

    for task_id in summary.task_ids() {
        let metric = config.aliases.resolve(summary.results.get(&task_id));
        let effective = summary.effective_samples(&task_id);
        let log_path = run.sample_log_path(&task_id);

        let (stats, source) = if log_path.exists() {
            match classify::classify_log(&log_path) {
                Ok(stats) => {
                    if stats.total() != effective {
                        diag(
                            config.quiet,
                            &format!(
                                "warning: {}: classified {} example(s), summary reports {}",
                                log_path.display(),
                                stats.total(),
                                effective
                            ),
                        );
                    }
                    (stats, StatsSource::SampleLog)
                }
                Err(e) => {
                    diag(
                        config.quiet,
                        &format!(
                            "warning: unreadable sample log {}: {}",
                            log_path.display(),
                            e
                        ),
                    );
                    estimate_or_unscored(metric, effective)
                }
            }
        } else {
            estimate_or_unscored(metric, effective)
        };

        tasks.push(TaskReport {
            task_id,
            stats,
            source,
        });
    }

    ModelReport {
        run,
        limit: summary.config.limit(),
        tasks,
    }
}

/// Estimation needs both a resolvable metric and a nonzero sample
/// count; a task missing either is unscored, not an estimate over
/// nothing.
fn estimate_or_unscored(metric: Option<f64>, effective_samples: u64) -> (TaskStats, StatsSource) {
    match metric {
        Some(value) if effective_samples > 0 => (
            classify::estimate_stats(value, effective_samples),
            StatsSource::Estimated,
        ),
        _ => (TaskStats::default(), StatsSource::Unscored),
    }
}

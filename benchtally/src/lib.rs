//! # benchtally
//!
//! Validity-aware aggregation and scoring of language-model benchmark
//! results.
//!
//! An external evaluation harness produces one summary JSON per run
//! and, optionally, per-task JSONL logs of every evaluated example.
//! benchtally turns those heterogeneous artifacts into a scoring report
//! that separates genuine incorrectness from format-following failure:
//! a response the extraction filter could not parse is *invalid*, not
//! merely wrong, and collapsing the two silently penalizes models that
//! reason correctly but answer in an unexpected shape.
//!
//! - **Raw accuracy**: correct / total, invalids counted as incorrect
//! - **Valid accuracy**: correct / (correct + wrong), invalids excluded
//! - **Invalid rate**: the format-following failure share
//!
//! When a run has no sample log, counters are estimated from the
//! published metric (assuming zero invalids) and every such row is
//! visibly marked as estimated.
//!
//! # Usage
//!
//! ```no_run
//! use benchtally::{aggregate_results, AggregateConfig};
//!
//! let config = AggregateConfig::new("results/");
//! let reports = aggregate_results(&config)?;
//! for model in &reports {
//!     println!("{}", benchtally::report::model_table(model));
//! }
//! # Ok::<(), benchtally::Error>(())
//! ```

#![warn(missing_docs)]

pub mod aggregate;
pub mod artifacts;
pub mod classify;
pub mod error;
pub mod metrics;
pub mod reconcile;
pub mod report;

#[cfg(feature = "cli")]
pub mod cli;

pub use aggregate::{
    aggregate_results, aggregate_run, AggregateConfig, ModelReport, StatsSource, TaskReport,
    TaskStats,
};
pub use artifacts::{ModelRun, SampleRecord, SummaryFile};
pub use classify::{classify, estimate_stats, Verdict};
pub use error::{Error, Result};
pub use metrics::MetricAliases;
pub use reconcile::{unified_task_ids, NOT_AVAILABLE};
pub use report::{ReportRow, CSV_HEADER};

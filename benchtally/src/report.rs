//! Report rendering: plain-text tables and the per-invocation CSV.
//!
//! Rendering is string-based so every table and the full CSV body can
//! be asserted on in tests; the CLI layer only decides where the
//! strings go.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::aggregate::{ModelReport, StatsSource, TaskReport};
use crate::error::Result;
use crate::reconcile::{self, NOT_AVAILABLE};

/// Fixed CSV header; column order is part of the output contract.
pub const CSV_HEADER: &str = "Model,Task,Raw_Acc,Valid_Acc,Correct,Wrong,Invalid,Total,Invalid_Pct";

/// One denormalized CSV row for a (run, task) pair. Created once and
/// never mutated; the CSV is append-only within an invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    /// Model name from the run identity.
    pub model_name: String,
    /// Task identifier.
    pub task_id: String,
    /// Accuracy counting invalids as incorrect.
    pub raw_acc: f64,
    /// Accuracy over scored responses only; `None` when undefined.
    pub valid_acc: Option<f64>,
    /// Correct count.
    pub correct: u64,
    /// Wrong count.
    pub wrong: u64,
    /// Invalid count.
    pub invalid: u64,
    /// Total classified examples.
    pub total: u64,
    /// Invalid share of total, as a percentage.
    pub invalid_pct: f64,
}

impl ReportRow {
    /// Build the row for one task of one run.
    #[must_use]
    pub fn new(model_name: &str, task: &TaskReport) -> Self {
        ReportRow {
            model_name: model_name.to_string(),
            task_id: task.task_id.clone(),
            raw_acc: task.stats.raw_accuracy(),
            valid_acc: task.stats.valid_accuracy(),
            correct: task.stats.correct,
            wrong: task.stats.wrong,
            invalid: task.stats.invalid,
            total: task.stats.total(),
            invalid_pct: task.stats.invalid_rate() * 100.0,
        }
    }

    fn to_csv_line(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{},{}",
            csv_field(&self.model_name),
            csv_field(&self.task_id),
            fmt_rate(self.raw_acc),
            fmt_optional_rate(self.valid_acc),
            self.correct,
            self.wrong,
            self.invalid,
            self.total,
            fmt_rate(self.invalid_pct),
        )
    }
}

/// All report rows: models in discovery order, tasks lexicographic
/// within each model.
#[must_use]
pub fn report_rows(reports: &[ModelReport]) -> Vec<ReportRow> {
    reports
        .iter()
        .flat_map(|report| {
            report
                .tasks
                .iter()
                .map(|task| ReportRow::new(&report.run.model_name, task))
        })
        .collect()
}

/// Render the full CSV body, header included.
#[must_use]
pub fn render_csv(rows: &[ReportRow]) -> String {
    let mut out = String::with_capacity(rows.len() * 64 + CSV_HEADER.len());
    out.push_str(CSV_HEADER);
    out.push('\n');
    for row in rows {
        out.push_str(&row.to_csv_line());
        out.push('\n');
    }
    out
}

/// Write the CSV into the results directory under a generation-
/// timestamped name, so reruns never clobber an earlier report.
/// Returns the path written.
pub fn write_csv(results_dir: &Path, rows: &[ReportRow]) -> Result<PathBuf> {
    let filename = format!("scores_{}.csv", Local::now().format("%Y%m%d_%H%M%S"));
    let path = results_dir.join(filename);

    let mut writer = BufWriter::new(File::create(&path)?);
    writer.write_all(render_csv(rows).as_bytes())?;
    writer.flush()?;
    Ok(path)
}

/// RFC-4180 quoting for fields that need it. Model and task names come
/// from filenames, so this rarely fires, but a comma in a task id must
/// not shear the row.
fn csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn fmt_rate(value: f64) -> String {
    format!("{:.4}", value)
}

fn fmt_optional_rate(value: Option<f64>) -> String {
    match value {
        Some(v) => fmt_rate(v),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn estimated_marker(source: StatsSource) -> &'static str {
    match source {
        StatsSource::Estimated => " *",
        StatsSource::SampleLog | StatsSource::Unscored => "",
    }
}

/// Per-model detail table: one row per task plus an overall roll-up
/// line computed sum-then-divide over the task counters.
#[must_use]
pub fn model_table(report: &ModelReport) -> String {
    let task_width = report
        .tasks
        .iter()
        .map(|t| t.task_id.len() + estimated_marker(t.source).len())
        .chain(std::iter::once("Overall".len()))
        .max()
        .unwrap_or(4)
        .max(4);

    let mut out = String::new();
    out.push_str(&format!(
        "{:<width$}  {:>10}  {:>10}  {:>8}\n",
        "Task",
        "Valid_Acc",
        "Invalid%",
        "Samples",
        width = task_width
    ));

    for task in &report.tasks {
        let label = format!("{}{}", task.task_id, estimated_marker(task.source));
        let (valid, invalid_pct, samples) = match task.source {
            StatsSource::Unscored => (
                NOT_AVAILABLE.to_string(),
                NOT_AVAILABLE.to_string(),
                NOT_AVAILABLE.to_string(),
            ),
            _ => (
                fmt_optional_rate(task.stats.valid_accuracy()),
                fmt_rate(task.stats.invalid_rate() * 100.0),
                task.stats.total().to_string(),
            ),
        };
        out.push_str(&format!(
            "{:<width$}  {:>10}  {:>10}  {:>8}\n",
            label,
            valid,
            invalid_pct,
            samples,
            width = task_width
        ));
    }

    let overall = report.overall();
    out.push_str(&format!(
        "{:<width$}  {:>10}  {:>10}  {:>8}\n",
        "Overall",
        fmt_optional_rate(overall.valid_accuracy()),
        fmt_rate(overall.invalid_rate() * 100.0),
        overall.total(),
        width = task_width
    ));

    out
}

/// Cross-model comparison table: unified task rows, one valid-accuracy
/// column per model. Cells for tasks a run never reported, and for
/// unscored tasks, render the explicit [`NOT_AVAILABLE`] sentinel.
#[must_use]
pub fn comparison_table(reports: &[ModelReport]) -> String {
    let task_ids = reconcile::unified_task_ids(reports);
    let task_width = task_ids
        .iter()
        .map(String::len)
        .chain(std::iter::once(4))
        .max()
        .unwrap_or(4);

    let col_widths: Vec<usize> = reports
        .iter()
        .map(|r| r.run.model_name.len().max(9))
        .collect();

    let mut out = String::new();
    out.push_str(&format!("{:<width$}", "Task", width = task_width));
    for (report, col) in reports.iter().zip(&col_widths) {
        out.push_str(&format!("  {:>width$}", report.run.model_name, width = *col));
    }
    out.push('\n');

    for task_id in &task_ids {
        out.push_str(&format!("{:<width$}", task_id, width = task_width));
        for (report, col) in reports.iter().zip(&col_widths) {
            let cell = match report.task(task_id) {
                Some(task) if task.source != StatsSource::Unscored => {
                    fmt_optional_rate(task.stats.valid_accuracy())
                }
                _ => NOT_AVAILABLE.to_string(),
            };
            out.push_str(&format!("  {:>width$}", cell, width = *col));
        }
        out.push('\n');
    }

    out
}

/// Legend printed under the console report.
#[must_use]
pub fn legend() -> String {
    [
        "Raw accuracy:   correct / total (invalid responses count as incorrect)",
        "Valid accuracy: correct / (correct + wrong) (invalid responses excluded)",
        "Invalid:        no answer could be extracted from the model response",
        "*               estimated from the published metric (no sample log; invalid assumed 0)",
        "N/A             value not available for this run",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{StatsSource, TaskReport, TaskStats};
    use crate::artifacts::ModelRun;

    fn run(model: &str) -> ModelRun {
        ModelRun {
            model_name: model.to_string(),
            run_timestamp: "2026-01-21T00-00-00".to_string(),
            source_path: format!("results_{}_2026-01-21T00-00-00.json", model).into(),
        }
    }

    fn task(id: &str, correct: u64, wrong: u64, invalid: u64, source: StatsSource) -> TaskReport {
        TaskReport {
            task_id: id.to_string(),
            stats: TaskStats {
                correct,
                wrong,
                invalid,
            },
            source,
        }
    }

    #[test]
    fn test_report_row_values() {
        let t = task("t1", 6, 2, 2, StatsSource::SampleLog);
        let row = ReportRow::new("m", &t);
        assert_eq!(row.correct + row.wrong + row.invalid, row.total);
        assert!((row.raw_acc - 0.6).abs() < 1e-12);
        assert_eq!(row.valid_acc, Some(0.75));
        assert!((row.invalid_pct - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_csv_renders_undefined_valid_acc_as_sentinel() {
        let t = task("t1", 0, 0, 4, StatsSource::SampleLog);
        let rows = vec![ReportRow::new("m", &t)];
        let csv = render_csv(&rows);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(CSV_HEADER));
        assert_eq!(lines.next(), Some("m,t1,0.0000,N/A,0,0,4,4,100.0000"));
    }

    #[test]
    fn test_csv_quotes_awkward_fields() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_rate_formatting_is_four_digits() {
        assert_eq!(fmt_rate(0.0), "0.0000");
        assert_eq!(fmt_rate(1.0 / 3.0), "0.3333");
        assert_eq!(fmt_optional_rate(None), "N/A");
    }

    #[test]
    fn test_model_table_marks_estimated_and_unscored() {
        let report = ModelReport {
            run: run("m"),
            limit: None,
            tasks: vec![
                task("logged", 8, 1, 1, StatsSource::SampleLog),
                task("guessed", 3, 7, 0, StatsSource::Estimated),
                task("missing", 0, 0, 0, StatsSource::Unscored),
            ],
        };
        let table = model_table(&report);
        assert!(table.contains("guessed *"));
        assert!(!table.contains("logged *"));
        assert!(table.lines().any(|l| l.starts_with("missing") && l.contains("N/A")));
        assert!(table.lines().last().unwrap().starts_with("Overall"));
    }

    #[test]
    fn test_comparison_table_unifies_tasks() {
        let a = ModelReport {
            run: run("model-a"),
            limit: None,
            tasks: vec![
                task("t1", 5, 5, 0, StatsSource::SampleLog),
                task("t2", 9, 1, 0, StatsSource::SampleLog),
            ],
        };
        let b = ModelReport {
            run: run("model-b"),
            limit: None,
            tasks: vec![
                task("t2", 4, 4, 2, StatsSource::SampleLog),
                task("t3", 1, 1, 0, StatsSource::Estimated),
            ],
        };
        let table = comparison_table(&[a, b]);

        // Unified, sorted row axis.
        let rows: Vec<&str> = table.lines().skip(1).collect();
        assert!(rows[0].starts_with("t1"));
        assert!(rows[1].starts_with("t2"));
        assert!(rows[2].starts_with("t3"));

        // Missing cells are the explicit sentinel, not blank or zero.
        assert!(rows[0].contains("N/A"), "model-b has no t1: {}", rows[0]);
        assert!(rows[2].contains("N/A"), "model-a has no t3: {}", rows[2]);
        assert!(rows[1].contains("0.9000"));
        assert!(rows[1].contains("0.5000"));
    }

    #[test]
    fn test_rows_are_deterministic_across_invocations() {
        let report = ModelReport {
            run: run("m"),
            limit: None,
            tasks: vec![task("t1", 1, 2, 3, StatsSource::SampleLog)],
        };
        let reports = vec![report];
        assert_eq!(
            render_csv(&report_rows(&reports)),
            render_csv(&report_rows(&reports))
        );
    }
}

//! CLI module for the benchtally binary.
//!
//! Argument structure and command implementation live here so the thin
//! binary crate only parses args and maps the result to an exit code.

pub mod output;

use std::path::PathBuf;

use clap::Parser;

use crate::aggregate::{self, AggregateConfig};
use crate::error::Result;
use crate::metrics::MetricAliases;
use crate::report;
use self::output::{color, log_info, metric_colored};

/// Aggregate benchmark result files into a validity-aware scoring report.
///
/// Scans RESULTS_DIR for harness summary files, classifies per-example
/// sample logs where present (falling back to metric-based estimation
/// where not), prints per-model and cross-model tables, and writes a
/// timestamped CSV back into RESULTS_DIR.
#[derive(Parser, Debug)]
#[command(name = "benchtally", version)]
pub struct Args {
    /// Directory containing harness result files
    #[arg(value_name = "RESULTS_DIR")]
    pub results_dir: PathBuf,

    /// Extra metric-key alias tried before the built-in list (repeatable)
    #[arg(long = "metric-alias", value_name = "KEY")]
    pub metric_aliases: Vec<String>,

    /// Skip writing the CSV file
    #[arg(long)]
    pub no_csv: bool,

    /// Suppress progress diagnostics
    #[arg(short, long)]
    pub quiet: bool,
}

/// Run the aggregation and print the report.
pub fn run(args: Args) -> Result<()> {
    let config = AggregateConfig {
        results_dir: args.results_dir.clone(),
        aliases: if args.metric_aliases.is_empty() {
            MetricAliases::default()
        } else {
            MetricAliases::with_overrides(&args.metric_aliases)
        },
        quiet: args.quiet,
    };

    let reports = aggregate::aggregate_results(&config)?;
    log_info(
        &format!("Aggregated {} run(s) from {}", reports.len(), config.results_dir.display()),
        args.quiet,
    );

    for model in &reports {
        let overall = model.overall();
        let limit = match model.limit {
            Some(n) => format!(", limit {}", n),
            None => String::new(),
        };
        println!(
            "\n{} ({}{})",
            color("1;36", &model.run.model_name),
            model.run.run_timestamp,
            limit
        );
        print!("{}", report::model_table(model));
        if let Some(valid) = overall.valid_accuracy() {
            println!(
                "Overall valid accuracy: {}%  ({} samples, {:.1}% invalid)",
                metric_colored(valid * 100.0),
                overall.total(),
                overall.invalid_rate() * 100.0
            );
        }
    }

    if reports.len() > 1 {
        println!("\n{}", color("1;36", "Model comparison (valid accuracy)"));
        print!("{}", report::comparison_table(&reports));
    }

    println!("\n{}", report::legend());

    if !args.no_csv {
        let rows = report::report_rows(&reports);
        let path = report::write_csv(&config.results_dir, &rows)?;
        log_info(&format!("CSV written to {}", path.display()), args.quiet);
    }

    Ok(())
}

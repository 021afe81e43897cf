//! Unifying task sets across runs for side-by-side comparison.

use std::collections::BTreeSet;

use crate::aggregate::ModelReport;

/// Sentinel for a (model, task) cell with no usable value. Rendered
/// wherever a blank or zero would be indistinguishable from a real
/// score.
pub const NOT_AVAILABLE: &str = "N/A";

/// Union of all task ids seen across the given runs, sorted
/// lexicographically. This is the row axis of every comparison table;
/// a run missing one of these tasks renders [`NOT_AVAILABLE`] there.
#[must_use]
pub fn unified_task_ids(reports: &[ModelReport]) -> Vec<String> {
    let mut ids: BTreeSet<&str> = BTreeSet::new();
    for report in reports {
        for task in &report.tasks {
            ids.insert(task.task_id.as_str());
        }
    }
    ids.into_iter().map(String::from).collect()
}

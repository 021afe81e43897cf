//! Metric key resolution across harness naming conventions.
//!
//! The harness has renamed its accuracy keys over time
//! (`exact_match,custom-extract`, `exact_match,none`, plain
//! `exact_match`, ...), and the key in use also varies per task
//! variant. Resolution reads through an ordered alias list, newest
//! naming first, so adding a future harness version means adding an
//! alias, not another nested conditional.
//!
//! Absence is `None`, never 0: a task whose metric cannot be resolved
//! must stay out of every rate denominator.

use std::collections::HashMap;

use serde_json::Value;

/// Built-in alias list, newest naming convention first.
pub const DEFAULT_ALIASES: &[&str] = &[
    "exact_match,custom-extract",
    "exact_match,flexible-extract",
    "exact_match,none",
    "exact_match",
];

/// Ordered list of metric-key aliases used to read a task's published
/// accuracy out of its raw metric mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricAliases {
    aliases: Vec<String>,
}

impl Default for MetricAliases {
    fn default() -> Self {
        MetricAliases {
            aliases: DEFAULT_ALIASES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl MetricAliases {
    /// Create a resolver with an explicit alias order.
    #[must_use]
    pub fn new(aliases: Vec<String>) -> Self {
        MetricAliases { aliases }
    }

    /// Built-in aliases with user-supplied ones tried first.
    #[must_use]
    pub fn with_overrides(extra: &[String]) -> Self {
        let mut aliases: Vec<String> = extra.to_vec();
        aliases.extend(DEFAULT_ALIASES.iter().map(|s| s.to_string()));
        MetricAliases { aliases }
    }

    /// The alias order in effect.
    #[must_use]
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Resolve a task's published metric value: the first alias present
    /// with a numeric value wins. Non-numeric values (the harness emits
    /// `"N/A"` strings for some aggregates) do not match.
    #[must_use]
    pub fn resolve(&self, task_metrics: Option<&HashMap<String, Value>>) -> Option<f64> {
        let metrics = task_metrics?;
        self.aliases
            .iter()
            .find_map(|alias| metrics.get(alias).and_then(Value::as_f64))
    }
}

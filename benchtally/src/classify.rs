//! Per-example classification and the no-sample-log fallback.
//!
//! The classifier turns one sample-log record into a closed tri-state
//! verdict. Every downstream consumer branches over [`Verdict`] instead
//! of re-deriving validity from raw fields, which is what separates a
//! genuinely wrong answer from a response the extraction filter could
//! not parse at all.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde_json::Value;

use crate::aggregate::TaskStats;
use crate::artifacts::SampleRecord;
use crate::error::Result;

/// Outcome of classifying one evaluated example.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// Extraction succeeded and the answer matched.
    Correct,
    /// Extraction succeeded but the answer did not match.
    Wrong,
    /// The extraction filter produced nothing usable; the example
    /// cannot be scored as wrong, only as unscorable.
    Invalid,
}

/// Classify one sample record.
///
/// Invalid is checked before correctness: an empty extraction with
/// `exact_match = 1.0` is still Invalid. A record that passes the
/// Invalid check but has no `exact_match` field counts as Wrong, never
/// Correct. Correct requires the exact-match score to equal 1.0
/// exactly; it is a match indicator, not a graded score.
#[must_use]
pub fn classify(record: &SampleRecord) -> Verdict {
    if extraction_is_empty(record.filtered_resps.as_ref()) {
        return Verdict::Invalid;
    }
    match record.exact_match {
        Some(score) if score == 1.0 => Verdict::Correct,
        _ => Verdict::Wrong,
    }
}

/// Whether the filter's output contains no usable answer.
///
/// The filter emits one entry per repeat; only the first is inspected.
/// Missing field, `null`, an empty list, and an empty or
/// whitespace-only string all count as empty.
fn extraction_is_empty(filtered_resps: Option<&Value>) -> bool {
    let value = match filtered_resps {
        None => return true,
        Some(v) => v,
    };
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(entries) => match entries.first() {
            None => true,
            Some(Value::Null) => true,
            Some(Value::String(s)) => s.trim().is_empty(),
            Some(Value::Array(inner)) => inner.is_empty(),
            Some(_) => false,
        },
        _ => false,
    }
}

/// Classify every line of a sample log into task counters.
///
/// Malformed lines are skipped without counting: log corruption is
/// tolerated best-effort and must not inflate totals.
pub fn classify_log(path: &Path) -> Result<TaskStats> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut stats = TaskStats::default();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<SampleRecord>(&line) {
            Ok(record) => stats.add(classify(&record)),
            Err(_) => continue,
        }
    }
    Ok(stats)
}

/// Reconstruct approximate counters from the published metric when no
/// sample log exists.
///
/// Without per-sample data there is no way to recover which responses
/// were unparsable, so the estimate assumes zero invalids. Callers must
/// carry the estimated marker through to the report; fallback-derived
/// rows are not as trustworthy as log-derived ones.
#[must_use]
pub fn estimate_stats(metric_value: f64, effective_samples: u64) -> TaskStats {
    let correct = ((metric_value * effective_samples as f64).round() as u64)
        .min(effective_samples);
    TaskStats {
        correct,
        wrong: effective_samples - correct,
        invalid: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(filtered_resps: Option<Value>, exact_match: Option<f64>) -> SampleRecord {
        SampleRecord {
            filtered_resps,
            exact_match,
        }
    }

    #[test]
    fn test_correct_and_wrong() {
        let r = record(Some(json!(["Paris"])), Some(1.0));
        assert_eq!(classify(&r), Verdict::Correct);

        let r = record(Some(json!(["Paris"])), Some(0.0));
        assert_eq!(classify(&r), Verdict::Wrong);
    }

    #[test]
    fn test_empty_extraction_is_invalid_regardless_of_score() {
        for resps in [
            None,
            Some(json!(null)),
            Some(json!([])),
            Some(json!([null])),
            Some(json!([""])),
            Some(json!(["   "])),
            Some(json!([[]])),
        ] {
            let r = record(resps.clone(), Some(1.0));
            assert_eq!(classify(&r), Verdict::Invalid, "resps: {:?}", resps);
        }
    }

    #[test]
    fn test_missing_exact_match_defaults_to_wrong() {
        let r = record(Some(json!(["42"])), None);
        assert_eq!(classify(&r), Verdict::Wrong);
    }

    #[test]
    fn test_partial_credit_is_not_correct() {
        // Strict equality with 1.0, not a threshold.
        let r = record(Some(json!(["almost"])), Some(0.999));
        assert_eq!(classify(&r), Verdict::Wrong);
    }

    #[test]
    fn test_bare_string_extraction() {
        let r = record(Some(json!("Paris")), Some(1.0));
        assert_eq!(classify(&r), Verdict::Correct);
    }

    #[test]
    fn test_estimate_rounds_and_assumes_no_invalids() {
        let stats = estimate_stats(0.6, 10);
        assert_eq!(stats.correct, 6);
        assert_eq!(stats.wrong, 4);
        assert_eq!(stats.invalid, 0);
    }

    #[test]
    fn test_estimate_clamps_out_of_range_metric() {
        let stats = estimate_stats(1.2, 10);
        assert_eq!(stats.correct, 10);
        assert_eq!(stats.wrong, 0);
    }

    #[test]
    fn test_estimate_zero_samples() {
        let stats = estimate_stats(0.5, 0);
        assert_eq!(stats.total(), 0);
    }

    #[test]
    fn test_classify_log_skips_malformed_lines() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"filtered_resps": ["a"], "exact_match": 1.0}}"#).unwrap();
        writeln!(file, "not json at all").unwrap();
        writeln!(file, r#"{{"filtered_resps": [""], "exact_match": 1.0}}"#).unwrap();
        writeln!(file, r#"{{"filtered_resps": ["b"], "exact_match": 0.0}}"#).unwrap();
        writeln!(file).unwrap();

        let stats = classify_log(file.path()).unwrap();
        assert_eq!(stats.correct, 1);
        assert_eq!(stats.wrong, 1);
        assert_eq!(stats.invalid, 1);
        // Malformed and blank lines contribute nothing.
        assert_eq!(stats.total(), 3);
    }
}

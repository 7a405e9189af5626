//! Cross-field consistency rules for the worker section.
//!
//! These invariants relate several fields and only apply when `hasWorkers`
//! is true:
//!
//! - `menWorkers + womenWorkers == totalWorkers`
//! - `over18Workers + under18Workers == totalWorkers`
//! - `pregnantWorkers <= womenWorkers` (when `hasPregnantWorkers`)
//! - `under18Workers > 0` requires `minorWorkersOccupation`
//! - `pregnantWorkers > 0` requires `pregnantWorkersOccupation`
//!
//! Every invariant is evaluated independently; a failing one contributes a
//! single issue tagged to its most relevant field. Missing numeric operands
//! count as zero.

use serde_json::{Map, Value};

use census_model::{FieldPath, Issue, IssueKind};

/// Evaluate all worker invariants against a candidate record.
pub fn check(record: &Map<String, Value>) -> Vec<Issue> {
    if !flag(record, "hasWorkers") {
        return Vec::new();
    }

    let total = count(record, "totalWorkers");
    let men = count(record, "menWorkers");
    let women = count(record, "womenWorkers");
    let over18 = count(record, "over18Workers");
    let under18 = count(record, "under18Workers");
    let has_pregnant = flag(record, "hasPregnantWorkers");
    let pregnant = if has_pregnant {
        count(record, "pregnantWorkers")
    } else {
        0
    };

    let mut issues = Vec::new();
    if men + women != total {
        issues.push(Issue::new(
            FieldPath::root("totalWorkers"),
            IssueKind::Consistency,
            "menWorkers and womenWorkers must add up to totalWorkers",
        ));
    }
    if over18 + under18 != total {
        issues.push(Issue::new(
            FieldPath::root("totalWorkers"),
            IssueKind::Consistency,
            "over18Workers and under18Workers must add up to totalWorkers",
        ));
    }
    if has_pregnant && pregnant > women {
        issues.push(Issue::new(
            FieldPath::root("pregnantWorkers"),
            IssueKind::Consistency,
            "pregnantWorkers cannot exceed womenWorkers",
        ));
    }
    if under18 > 0 && !has_text(record, "minorWorkersOccupation") {
        issues.push(Issue::new(
            FieldPath::root("minorWorkersOccupation"),
            IssueKind::Consistency,
            "minorWorkersOccupation is required when under18Workers is greater than zero",
        ));
    }
    if pregnant > 0 && !has_text(record, "pregnantWorkersOccupation") {
        issues.push(Issue::new(
            FieldPath::root("pregnantWorkersOccupation"),
            IssueKind::Consistency,
            "pregnantWorkersOccupation is required when pregnantWorkers is greater than zero",
        ));
    }
    issues
}

fn flag(record: &Map<String, Value>, field: &str) -> bool {
    record.get(field).and_then(Value::as_bool).unwrap_or(false)
}

fn count(record: &Map<String, Value>, field: &str) -> i64 {
    record.get(field).and_then(Value::as_i64).unwrap_or(0)
}

fn has_text(record: &Map<String, Value>, field: &str) -> bool {
    record
        .get(field)
        .and_then(Value::as_str)
        .is_some_and(|text| !text.trim().is_empty())
}

//! Validation engine for census person records.
//!
//! A candidate record arrives as decoded JSON and passes through two stages:
//!
//! 1. **Field schema** ([`schema`]): presence, shape, and domain checks per
//!    field, including conditional requirements guarded by sibling booleans
//!    and nested sequence validation (`crops`, `family`).
//! 2. **Cross-field invariants** ([`cross_field`]): worker-count arithmetic
//!    and conditional occupation rules, evaluated only when `hasWorkers`.
//!
//! Every applicable rule runs; all findings are collected into a single
//! [`ValidationReport`] tagged by field path. Nothing short-circuits. The
//! only abort is [`StructuralFault`]: input that is not a JSON object and
//! therefore cannot be decomposed into fields at all.
//!
//! A clean report yields the normalized [`Person`], with fields that are
//! irrelevant under the record's boolean switches stripped.

pub mod age;
pub mod checksum;
pub mod cross_field;
pub mod schema;

use serde_json::{Map, Value};
use thiserror::Error;

use census_model::{Person, ValidationReport};

pub use age::{ADULT_AGE_YEARS, Clock, SystemClock, adult_cutoff, is_adult};
pub use checksum::{
    IdCheckError, check_national_id, check_tax_id, national_id_is_valid, tax_id_is_valid,
};
pub use schema::{FIELD_RULES, FieldRule, Requirement, Shape, check_field, rule_for};

/// The input cannot be interpreted as a record at all.
///
/// This is the only condition that aborts validation instead of being
/// collected into the report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("input cannot be interpreted as a record: expected a JSON object, got {got}")]
pub struct StructuralFault {
    pub got: &'static str,
}

impl StructuralFault {
    fn from_value(value: &Value) -> Self {
        let got = match value {
            Value::Null => "null",
            Value::Bool(_) => "a boolean",
            Value::Number(_) => "a number",
            Value::String(_) => "a string",
            Value::Array(_) => "an array",
            Value::Object(_) => "an object",
        };
        Self { got }
    }
}

/// Outcome of validating one candidate record.
#[derive(Debug, Clone)]
pub struct RecordValidation {
    /// The normalized record; present iff the report is clean.
    pub record: Option<Person>,
    /// All findings, per-field first (in rule order), then cross-field.
    pub report: ValidationReport,
}

impl RecordValidation {
    pub fn is_valid(&self) -> bool {
        self.record.is_some()
    }

    /// Collapse into the accepted record or the full error report.
    pub fn into_result(self) -> Result<Person, ValidationReport> {
        match self.record {
            Some(person) => Ok(person),
            None => Err(self.report),
        }
    }
}

/// Validate a candidate record.
///
/// Runs the complete rule set and returns every violation at once, so a
/// caller can surface all problems in a single pass rather than forcing a
/// fix-one-resubmit loop.
pub fn validate(candidate: &Value, clock: &dyn Clock) -> Result<RecordValidation, StructuralFault> {
    let Some(record) = candidate.as_object() else {
        return Err(StructuralFault::from_value(candidate));
    };

    let mut report = ValidationReport::default();
    report.extend(schema::check_fields(record, clock));
    report.extend(cross_field::check(record));

    let normalized = if report.is_clean() {
        build_person(record)
    } else {
        None
    };
    Ok(RecordValidation {
        record: normalized,
        report,
    })
}

/// Build the normalized record from a candidate that passed every rule.
///
/// Fields governed by a false boolean switch are dropped: they may have been
/// present (and were still validated), but do not belong to the accepted
/// record.
fn build_person(record: &Map<String, Value>) -> Option<Person> {
    let has_tax_id = flag(record, "hasTaxId")?;
    let has_farm = flag(record, "hasFarm")?;
    let has_workers = flag(record, "hasWorkers")?;
    let has_pregnant_workers = flag(record, "hasPregnantWorkers")?;

    let family = record
        .get("family")?
        .as_array()?
        .iter()
        .map(|member| {
            let fields = member.as_object()?;
            Some(census_model::FamilyMember {
                name: text(fields, "name")?,
                last_name: text(fields, "lastName")?,
                national_id: text(fields, "nationalId")?,
            })
        })
        .collect::<Option<Vec<_>>>()?;

    Some(Person {
        id: record
            .get("id")
            .and_then(Value::as_str)
            .and_then(|raw| raw.parse().ok()),
        name: text(record, "name")?,
        last_name: text(record, "lastName")?,
        national_id: text(record, "nationalId")?,
        date_of_birth: record
            .get("dateOfBirth")
            .and_then(Value::as_str)
            .and_then(schema::parse_date)?,
        gender: record
            .get("gender")
            .and_then(Value::as_str)
            .and_then(|raw| raw.parse().ok())?,
        has_tax_id,
        tax_id: has_tax_id.then(|| text(record, "taxId")).flatten(),
        has_farm,
        farm_area_hectares: if has_farm {
            record.get("farmAreaHectares").and_then(Value::as_f64)
        } else {
            None
        },
        farm_name: has_farm.then(|| text(record, "farmName")).flatten(),
        crops: if has_farm {
            record
                .get("crops")
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default()
        } else {
            Vec::new()
        },
        family,
        has_workers,
        total_workers: has_workers.then(|| count(record, "totalWorkers")).flatten(),
        men_workers: has_workers.then(|| count(record, "menWorkers")).flatten(),
        women_workers: has_workers.then(|| count(record, "womenWorkers")).flatten(),
        over18_workers: has_workers.then(|| count(record, "over18Workers")).flatten(),
        under18_workers: has_workers.then(|| count(record, "under18Workers")).flatten(),
        minor_workers_occupation: has_workers
            .then(|| text(record, "minorWorkersOccupation"))
            .flatten()
            .filter(|value| !value.trim().is_empty()),
        has_pregnant_workers,
        pregnant_workers: has_pregnant_workers
            .then(|| count(record, "pregnantWorkers"))
            .flatten(),
        pregnant_workers_occupation: has_pregnant_workers
            .then(|| text(record, "pregnantWorkersOccupation"))
            .flatten()
            .filter(|value| !value.trim().is_empty()),
    })
}

fn flag(record: &Map<String, Value>, field: &str) -> Option<bool> {
    record.get(field).and_then(Value::as_bool)
}

fn text(record: &Map<String, Value>, field: &str) -> Option<String> {
    record
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn count(record: &Map<String, Value>, field: &str) -> Option<u32> {
    record
        .get(field)
        .and_then(Value::as_i64)
        .and_then(|number| u32::try_from(number).ok())
}

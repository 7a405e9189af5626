//! Per-field validation rules.
//!
//! The rule set is a static table: one [`FieldRule`] per record field, naming
//! its requirement and shape. Conditional requirements are guard predicates
//! over a sibling boolean (`taxId` is required only when `hasTaxId` is true);
//! when the guard is false the field is not required, but a present value is
//! still shape-checked and reported if invalid.
//!
//! Evaluation walks the table in declaration order, so issue order is
//! deterministic. No rule aborts the walk.

use chrono::NaiveDate;
use serde_json::{Map, Value};

use census_model::{FieldPath, Issue, IssueKind};

use crate::age::{Clock, is_adult};
use crate::checksum::{IdCheckError, check_national_id, check_tax_id};

/// When a field must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Required unconditionally.
    Always,
    /// Required only when the named sibling boolean is true.
    When(&'static str),
    /// Never required; validated only when present.
    Optional,
}

/// The expected shape and domain of a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Bool,
    /// Free text. `non_empty` rejects blank values for required fields;
    /// `max_len` caps the character count.
    Text {
        non_empty: bool,
        max_len: Option<usize>,
    },
    BirthDate,
    Gender,
    NationalId,
    TaxId,
    /// A number strictly greater than zero.
    PositiveNumber,
    /// A non-negative integer, at least `min`.
    Count { min: u32 },
    /// Sequence of non-empty crop names, at least one element.
    Crops,
    /// Sequence of 1..=10 family member objects.
    Family,
}

/// One entry of the rule table.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub requirement: Requirement,
    pub shape: Shape,
}

pub const MAX_FAMILY_MEMBERS: usize = 10;
pub const MAX_OCCUPATION_LEN: usize = 200;

/// The full rule set, in reporting order.
pub const FIELD_RULES: &[FieldRule] = &[
    FieldRule {
        field: "name",
        requirement: Requirement::Always,
        shape: Shape::Text {
            non_empty: true,
            max_len: None,
        },
    },
    FieldRule {
        field: "lastName",
        requirement: Requirement::Always,
        shape: Shape::Text {
            non_empty: true,
            max_len: None,
        },
    },
    FieldRule {
        field: "nationalId",
        requirement: Requirement::Always,
        shape: Shape::NationalId,
    },
    FieldRule {
        field: "dateOfBirth",
        requirement: Requirement::Always,
        shape: Shape::BirthDate,
    },
    FieldRule {
        field: "gender",
        requirement: Requirement::Always,
        shape: Shape::Gender,
    },
    FieldRule {
        field: "hasTaxId",
        requirement: Requirement::Always,
        shape: Shape::Bool,
    },
    FieldRule {
        field: "taxId",
        requirement: Requirement::When("hasTaxId"),
        shape: Shape::TaxId,
    },
    FieldRule {
        field: "hasFarm",
        requirement: Requirement::Always,
        shape: Shape::Bool,
    },
    FieldRule {
        field: "farmAreaHectares",
        requirement: Requirement::When("hasFarm"),
        shape: Shape::PositiveNumber,
    },
    FieldRule {
        field: "farmName",
        requirement: Requirement::When("hasFarm"),
        shape: Shape::Text {
            non_empty: true,
            max_len: None,
        },
    },
    FieldRule {
        field: "crops",
        requirement: Requirement::When("hasFarm"),
        shape: Shape::Crops,
    },
    FieldRule {
        field: "family",
        requirement: Requirement::Always,
        shape: Shape::Family,
    },
    FieldRule {
        field: "hasWorkers",
        requirement: Requirement::Always,
        shape: Shape::Bool,
    },
    FieldRule {
        field: "totalWorkers",
        requirement: Requirement::When("hasWorkers"),
        shape: Shape::Count { min: 1 },
    },
    FieldRule {
        field: "menWorkers",
        requirement: Requirement::When("hasWorkers"),
        shape: Shape::Count { min: 0 },
    },
    FieldRule {
        field: "womenWorkers",
        requirement: Requirement::When("hasWorkers"),
        shape: Shape::Count { min: 0 },
    },
    FieldRule {
        field: "over18Workers",
        requirement: Requirement::When("hasWorkers"),
        shape: Shape::Count { min: 0 },
    },
    FieldRule {
        field: "under18Workers",
        requirement: Requirement::When("hasWorkers"),
        shape: Shape::Count { min: 0 },
    },
    FieldRule {
        field: "minorWorkersOccupation",
        requirement: Requirement::Optional,
        shape: Shape::Text {
            non_empty: false,
            max_len: None,
        },
    },
    FieldRule {
        field: "hasPregnantWorkers",
        requirement: Requirement::Always,
        shape: Shape::Bool,
    },
    FieldRule {
        field: "pregnantWorkers",
        requirement: Requirement::When("hasPregnantWorkers"),
        shape: Shape::Count { min: 1 },
    },
    FieldRule {
        field: "pregnantWorkersOccupation",
        requirement: Requirement::Optional,
        shape: Shape::Text {
            non_empty: false,
            max_len: Some(MAX_OCCUPATION_LEN),
        },
    },
];

/// Look up the rule for a field name.
pub fn rule_for(field: &str) -> Option<&'static FieldRule> {
    FIELD_RULES.iter().find(|rule| rule.field == field)
}

/// Run every field rule against a candidate record.
pub fn check_fields(record: &Map<String, Value>, clock: &dyn Clock) -> Vec<Issue> {
    let mut issues = Vec::new();
    for rule in FIELD_RULES {
        issues.extend(check_rule(rule, record, clock));
    }
    issues
}

/// Run a single field's rule, for incremental per-field callers.
///
/// Returns an empty list for unknown fields: values outside the schema are
/// ignored, not rejected.
pub fn check_field(field: &str, record: &Map<String, Value>, clock: &dyn Clock) -> Vec<Issue> {
    match rule_for(field) {
        Some(rule) => check_rule(rule, record, clock),
        None => Vec::new(),
    }
}

fn check_rule(rule: &FieldRule, record: &Map<String, Value>, clock: &dyn Clock) -> Vec<Issue> {
    let value = record.get(rule.field).filter(|value| !value.is_null());
    let Some(value) = value else {
        if is_required(rule, record) {
            return vec![required_issue(rule)];
        }
        return Vec::new();
    };
    check_shape(rule, value, record, clock)
}

fn is_required(rule: &FieldRule, record: &Map<String, Value>) -> bool {
    match rule.requirement {
        Requirement::Always => true,
        Requirement::When(flag) => record.get(flag).and_then(Value::as_bool).unwrap_or(false),
        Requirement::Optional => false,
    }
}

fn required_issue(rule: &FieldRule) -> Issue {
    let message = match rule.requirement {
        Requirement::When(flag) => format!("{} is required when {flag} is true", rule.field),
        _ => format!("{} is required", rule.field),
    };
    Issue::new(FieldPath::root(rule.field), IssueKind::Required, message)
}

fn check_shape(
    rule: &FieldRule,
    value: &Value,
    record: &Map<String, Value>,
    clock: &dyn Clock,
) -> Vec<Issue> {
    let path = FieldPath::root(rule.field);
    match rule.shape {
        Shape::Bool => check_bool(rule, value),
        Shape::Text { non_empty, max_len } => check_text(rule, value, record, non_empty, max_len),
        Shape::BirthDate => check_birth_date(rule, value, clock),
        Shape::Gender => check_gender(rule, value),
        Shape::NationalId => check_id(rule, value, check_national_id),
        Shape::TaxId => check_id(rule, value, check_tax_id),
        Shape::PositiveNumber => check_positive_number(rule, value),
        Shape::Count { min } => check_count(path, rule.field, value, min),
        Shape::Crops => check_crops(value),
        Shape::Family => check_family(value),
    }
}

fn check_bool(rule: &FieldRule, value: &Value) -> Vec<Issue> {
    if value.as_bool().is_some() {
        return Vec::new();
    }
    vec![Issue::new(
        FieldPath::root(rule.field),
        IssueKind::Format,
        format!("{} must be true or false", rule.field),
    )]
}

fn check_text(
    rule: &FieldRule,
    value: &Value,
    record: &Map<String, Value>,
    non_empty: bool,
    max_len: Option<usize>,
) -> Vec<Issue> {
    let path = FieldPath::root(rule.field);
    let Some(text) = value.as_str() else {
        return vec![Issue::new(
            path,
            IssueKind::Format,
            format!("{} must be a string", rule.field),
        )];
    };
    if non_empty && text.trim().is_empty() {
        // a blank value counts as absent for required text fields
        if is_required(rule, record) {
            return vec![required_issue(rule)];
        }
        return Vec::new();
    }
    if let Some(limit) = max_len
        && text.chars().count() > limit
    {
        return vec![Issue::new(
            path,
            IssueKind::Format,
            format!("{} cannot exceed {limit} characters", rule.field),
        )];
    }
    Vec::new()
}

fn check_birth_date(rule: &FieldRule, value: &Value, clock: &dyn Clock) -> Vec<Issue> {
    let path = FieldPath::root(rule.field);
    let Some(text) = value.as_str() else {
        return vec![Issue::new(
            path,
            IssueKind::Format,
            format!("{} must be a date string", rule.field),
        )];
    };
    let Some(born) = parse_date(text) else {
        return vec![Issue::new(
            path,
            IssueKind::Format,
            format!("{} is not a valid date (expected YYYY-MM-DD)", rule.field),
        )];
    };
    if !is_adult(born, clock.today()) {
        return vec![Issue::new(
            path,
            IssueKind::Range,
            "must be at least 18 years old",
        )];
    }
    Vec::new()
}

fn check_gender(rule: &FieldRule, value: &Value) -> Vec<Issue> {
    let path = FieldPath::root(rule.field);
    let valid = value
        .as_str()
        .is_some_and(|text| text.parse::<census_model::Gender>().is_ok());
    if valid {
        return Vec::new();
    }
    vec![Issue::new(
        path,
        IssueKind::Format,
        format!("{} must be one of: male, female, other", rule.field),
    )]
}

fn check_id(
    rule: &FieldRule,
    value: &Value,
    check: fn(&str) -> Result<(), IdCheckError>,
) -> Vec<Issue> {
    let path = FieldPath::root(rule.field);
    let Some(text) = value.as_str() else {
        return vec![Issue::new(
            path,
            IssueKind::Format,
            format!("{} must be a string of digits", rule.field),
        )];
    };
    match check(text) {
        Ok(()) => Vec::new(),
        Err(error) => vec![id_issue(path, rule.field, &error)],
    }
}

fn id_issue(path: FieldPath, field: &str, error: &IdCheckError) -> Issue {
    let kind = if error.is_format() {
        IssueKind::Format
    } else {
        IssueKind::Checksum
    };
    Issue::new(path, kind, format!("{field} {error}"))
}

fn check_positive_number(rule: &FieldRule, value: &Value) -> Vec<Issue> {
    let path = FieldPath::root(rule.field);
    let Some(number) = value.as_f64() else {
        return vec![Issue::new(
            path,
            IssueKind::Format,
            format!("{} must be a number", rule.field),
        )];
    };
    if number <= 0.0 {
        return vec![Issue::new(
            path,
            IssueKind::Range,
            format!("{} must be a positive number", rule.field),
        )];
    }
    Vec::new()
}

fn check_count(path: FieldPath, field: &str, value: &Value, min: u32) -> Vec<Issue> {
    let Some(number) = value.as_i64() else {
        return vec![Issue::new(
            path,
            IssueKind::Format,
            format!("{field} must be an integer"),
        )];
    };
    if number < 0 {
        return vec![Issue::new(
            path,
            IssueKind::Range,
            format!("{field} cannot be negative"),
        )];
    }
    if number < i64::from(min) {
        return vec![Issue::new(
            path,
            IssueKind::Range,
            format!("{field} must be at least {min}"),
        )];
    }
    Vec::new()
}

fn check_crops(value: &Value) -> Vec<Issue> {
    let path = FieldPath::root("crops");
    let Some(items) = value.as_array() else {
        return vec![Issue::new(
            path,
            IssueKind::Format,
            "crops must be a list of crop names",
        )];
    };
    if items.is_empty() {
        return vec![Issue::new(
            path,
            IssueKind::Range,
            "at least one crop is required",
        )];
    }
    let mut issues = Vec::new();
    for (idx, item) in items.iter().enumerate() {
        let element = FieldPath::root("crops").index(idx);
        match item.as_str() {
            None => issues.push(Issue::new(
                element,
                IssueKind::Format,
                "crop name must be a string",
            )),
            Some(text) if text.trim().is_empty() => issues.push(Issue::new(
                element,
                IssueKind::Required,
                "crop name is required",
            )),
            Some(_) => {}
        }
    }
    issues
}

fn check_family(value: &Value) -> Vec<Issue> {
    let path = FieldPath::root("family");
    let Some(members) = value.as_array() else {
        return vec![Issue::new(
            path,
            IssueKind::Format,
            "family must be a list of family members",
        )];
    };
    if members.is_empty() {
        return vec![Issue::new(
            path,
            IssueKind::Range,
            "family must include at least 1 member",
        )];
    }
    if members.len() > MAX_FAMILY_MEMBERS {
        return vec![Issue::new(
            path,
            IssueKind::Range,
            format!("family cannot include more than {MAX_FAMILY_MEMBERS} members"),
        )];
    }
    let mut issues = Vec::new();
    for (idx, member) in members.iter().enumerate() {
        issues.extend(check_family_member(idx, member));
    }
    issues
}

fn check_family_member(idx: usize, member: &Value) -> Vec<Issue> {
    let element = FieldPath::root("family").index(idx);
    let Some(fields) = member.as_object() else {
        return vec![Issue::new(
            element,
            IssueKind::Format,
            "family member must be an object",
        )];
    };
    let mut issues = Vec::new();
    for name in ["name", "lastName"] {
        let path = element.clone().child(name);
        match fields.get(name).filter(|value| !value.is_null()) {
            None => issues.push(Issue::new(
                path,
                IssueKind::Required,
                format!("{name} is required"),
            )),
            Some(value) => match value.as_str() {
                None => issues.push(Issue::new(
                    path,
                    IssueKind::Format,
                    format!("{name} must be a string"),
                )),
                Some(text) if text.trim().is_empty() => issues.push(Issue::new(
                    path,
                    IssueKind::Required,
                    format!("{name} is required"),
                )),
                Some(_) => {}
            },
        }
    }
    let id_path = element.child("nationalId");
    match fields.get("nationalId").filter(|value| !value.is_null()) {
        None => issues.push(Issue::new(
            id_path,
            IssueKind::Required,
            "nationalId is required",
        )),
        Some(value) => match value.as_str() {
            None => issues.push(Issue::new(
                id_path,
                IssueKind::Format,
                "nationalId must be a string of digits",
            )),
            Some(text) => {
                if let Err(error) = check_national_id(text) {
                    issues.push(id_issue(id_path, "nationalId", &error));
                }
            }
        },
    }
    issues
}

/// Parse a wire date: plain `YYYY-MM-DD`, or an RFC 3339 timestamp.
pub(crate) fn parse_date(text: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    chrono::DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|stamp| stamp.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FixedClock(NaiveDate);

    impl Clock for FixedClock {
        fn today(&self) -> NaiveDate {
            self.0
        }
    }

    fn clock() -> FixedClock {
        FixedClock(NaiveDate::from_ymd_opt(2026, 8, 7).expect("valid test date"))
    }

    fn as_map(value: Value) -> Map<String, Value> {
        value.as_object().expect("test value is an object").clone()
    }

    #[test]
    fn absent_optional_field_is_skipped() {
        let record = as_map(json!({ "hasTaxId": false }));
        assert!(check_field("taxId", &record, &clock()).is_empty());
    }

    #[test]
    fn absent_conditional_field_is_required_when_flag_set() {
        let record = as_map(json!({ "hasTaxId": true }));
        let issues = check_field("taxId", &record, &clock());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::Required);
        assert_eq!(issues[0].message, "taxId is required when hasTaxId is true");
    }

    #[test]
    fn present_value_is_checked_even_when_not_required() {
        // hasTaxId=false does not excuse an invalid taxId value
        let record = as_map(json!({ "hasTaxId": false, "taxId": "1710034066001" }));
        let issues = check_field("taxId", &record, &clock());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::Checksum);
    }

    #[test]
    fn blank_required_text_reports_required() {
        let record = as_map(json!({ "name": "   " }));
        let issues = check_field("name", &record, &clock());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::Required);
    }

    #[test]
    fn occupation_length_is_capped() {
        let record = as_map(json!({ "pregnantWorkersOccupation": "x".repeat(201) }));
        let issues = check_field("pregnantWorkersOccupation", &record, &clock());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::Format);

        let record = as_map(json!({ "pregnantWorkersOccupation": "x".repeat(200) }));
        assert!(check_field("pregnantWorkersOccupation", &record, &clock()).is_empty());
    }

    #[test]
    fn underage_birth_date_is_out_of_range() {
        let record = as_map(json!({ "dateOfBirth": "2010-01-01" }));
        let issues = check_field("dateOfBirth", &record, &clock());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::Range);
    }

    #[test]
    fn malformed_birth_date_is_a_format_issue() {
        let record = as_map(json!({ "dateOfBirth": "01/15/1990" }));
        let issues = check_field("dateOfBirth", &record, &clock());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::Format);
    }

    #[test]
    fn rfc3339_birth_dates_are_accepted() {
        let record = as_map(json!({ "dateOfBirth": "1990-01-15T00:00:00Z" }));
        assert!(check_field("dateOfBirth", &record, &clock()).is_empty());
    }

    #[test]
    fn count_rejects_fractions_and_negatives() {
        let record = as_map(json!({ "hasWorkers": true, "menWorkers": 2.5 }));
        let issues = check_field("menWorkers", &record, &clock());
        assert_eq!(issues[0].kind, IssueKind::Format);

        let record = as_map(json!({ "hasWorkers": true, "menWorkers": -1 }));
        let issues = check_field("menWorkers", &record, &clock());
        assert_eq!(issues[0].kind, IssueKind::Range);

        let record = as_map(json!({ "hasWorkers": true, "totalWorkers": 0 }));
        let issues = check_field("totalWorkers", &record, &clock());
        assert_eq!(issues[0].kind, IssueKind::Range);
    }

    #[test]
    fn family_member_issues_are_indexed() {
        let record = as_map(json!({
            "family": [
                { "name": "Ana", "lastName": "Mora", "nationalId": "1710034065" },
                { "name": "", "lastName": "Mora", "nationalId": "1710034066" },
            ]
        }));
        let issues = check_field("family", &record, &clock());
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].field.as_str(), "family[1].name");
        assert_eq!(issues[0].kind, IssueKind::Required);
        assert_eq!(issues[1].field.as_str(), "family[1].nationalId");
        assert_eq!(issues[1].kind, IssueKind::Checksum);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let record = as_map(json!({ "favouriteColour": "green" }));
        assert!(check_field("favouriteColour", &record, &clock()).is_empty());
    }
}

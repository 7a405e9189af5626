//! End-to-end validation scenarios.

use chrono::NaiveDate;
use serde_json::{Value, json};

use census_model::IssueKind;
use census_validate::{Clock, validate};

struct FixedClock(NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

fn clock() -> FixedClock {
    FixedClock(NaiveDate::from_ymd_opt(2026, 8, 7).expect("valid test date"))
}

fn valid_candidate() -> Value {
    json!({
        "name": "Maria",
        "lastName": "Paredes",
        "nationalId": "1710034065",
        "dateOfBirth": "1988-04-12",
        "gender": "female",
        "hasTaxId": false,
        "hasFarm": true,
        "farmAreaHectares": 3.5,
        "farmName": "La Esperanza",
        "crops": ["maize"],
        "family": [
            { "name": "Jorge", "lastName": "Paredes", "nationalId": "1710034040" }
        ],
        "hasWorkers": false,
        "hasPregnantWorkers": false
    })
}

#[test]
fn fully_valid_record_is_accepted() {
    let outcome = validate(&valid_candidate(), &clock()).expect("object input");
    assert!(outcome.report.is_clean(), "issues: {:?}", outcome.report);
    let person = outcome.record.expect("clean report yields a record");
    assert_eq!(person.name, "Maria");
    assert_eq!(person.crops, vec!["maize"]);
    assert_eq!(person.family.len(), 1);
    assert_eq!(person.total_workers, None);
}

#[test]
fn normalization_is_idempotent() {
    let outcome = validate(&valid_candidate(), &clock()).expect("object input");
    let person = outcome.record.expect("valid record");

    let reserialized = serde_json::to_value(&person).expect("serialize person");
    let second = validate(&reserialized, &clock()).expect("object input");
    assert!(second.report.is_clean(), "issues: {:?}", second.report);
    assert_eq!(second.record.expect("valid record"), person);
}

#[test]
fn farm_fields_not_required_without_farm() {
    let candidate = json!({
        "name": "Luis",
        "lastName": "Andrade",
        "nationalId": "0101234565",
        "dateOfBirth": "1975-11-02",
        "gender": "male",
        "hasTaxId": false,
        "hasFarm": false,
        "family": [
            { "name": "Rosa", "lastName": "Andrade", "nationalId": "1710034065" }
        ],
        "hasWorkers": false,
        "hasPregnantWorkers": false
    });
    let outcome = validate(&candidate, &clock()).expect("object input");
    assert!(outcome.report.is_clean(), "issues: {:?}", outcome.report);
}

#[test]
fn missing_farm_name_is_reported_when_farm_present() {
    let mut candidate = valid_candidate();
    candidate
        .as_object_mut()
        .expect("object candidate")
        .remove("farmName");
    let outcome = validate(&candidate, &clock()).expect("object input");
    let issues = outcome.report.issues_for("farmName");
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, IssueKind::Required);
    assert_eq!(outcome.report.issue_count(), 1);
}

#[test]
fn irrelevant_but_invalid_fields_are_still_reported() {
    let mut candidate = valid_candidate();
    let record = candidate.as_object_mut().expect("object candidate");
    record.insert("hasFarm".to_string(), json!(false));
    record.insert("farmAreaHectares".to_string(), json!(-2.0));
    let outcome = validate(&candidate, &clock()).expect("object input");
    let issues = outcome.report.issues_for("farmAreaHectares");
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, IssueKind::Range);
}

#[test]
fn irrelevant_valid_fields_are_stripped_from_the_accepted_record() {
    let mut candidate = valid_candidate();
    let record = candidate.as_object_mut().expect("object candidate");
    record.insert("hasFarm".to_string(), json!(false));
    record.insert("hasTaxId".to_string(), json!(false));
    record.insert("taxId".to_string(), json!("1710034065001"));
    let outcome = validate(&candidate, &clock()).expect("object input");
    assert!(outcome.report.is_clean(), "issues: {:?}", outcome.report);

    let person = outcome.record.expect("valid record");
    assert_eq!(person.tax_id, None);
    assert_eq!(person.farm_name, None);
    assert_eq!(person.farm_area_hectares, None);
    assert!(person.crops.is_empty());
}

#[test]
fn worker_sum_mismatch_is_tagged_to_total() {
    let mut candidate = valid_candidate();
    let record = candidate.as_object_mut().expect("object candidate");
    record.insert("hasWorkers".to_string(), json!(true));
    record.insert("totalWorkers".to_string(), json!(5));
    record.insert("menWorkers".to_string(), json!(2));
    record.insert("womenWorkers".to_string(), json!(2));
    record.insert("over18Workers".to_string(), json!(5));
    record.insert("under18Workers".to_string(), json!(0));
    let outcome = validate(&candidate, &clock()).expect("object input");
    assert_eq!(outcome.report.issue_count(), 1);
    let issues = outcome.report.issues_for("totalWorkers");
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, IssueKind::Consistency);
}

#[test]
fn minor_occupation_missing_adds_exactly_one_issue() {
    let mut candidate = valid_candidate();
    let record = candidate.as_object_mut().expect("object candidate");
    record.insert("hasWorkers".to_string(), json!(true));
    record.insert("totalWorkers".to_string(), json!(5));
    record.insert("menWorkers".to_string(), json!(3));
    record.insert("womenWorkers".to_string(), json!(2));
    record.insert("over18Workers".to_string(), json!(4));
    record.insert("under18Workers".to_string(), json!(1));
    let outcome = validate(&candidate, &clock()).expect("object input");
    assert_eq!(outcome.report.issue_count(), 1);
    let issues = outcome.report.issues_for("minorWorkersOccupation");
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, IssueKind::Consistency);
}

#[test]
fn family_size_boundaries() {
    let member = json!({ "name": "Ana", "lastName": "Mora", "nationalId": "1710034065" });

    let mut candidate = valid_candidate();
    candidate
        .as_object_mut()
        .expect("object candidate")
        .insert("family".to_string(), json!([]));
    let outcome = validate(&candidate, &clock()).expect("object input");
    assert_eq!(outcome.report.issues_for("family").len(), 1);

    let ten: Vec<Value> = std::iter::repeat_n(member.clone(), 10).collect();
    let mut candidate = valid_candidate();
    candidate
        .as_object_mut()
        .expect("object candidate")
        .insert("family".to_string(), Value::Array(ten));
    let outcome = validate(&candidate, &clock()).expect("object input");
    assert!(outcome.report.issues_for("family").is_empty());
    assert!(outcome.report.is_clean(), "issues: {:?}", outcome.report);

    let eleven: Vec<Value> = std::iter::repeat_n(member, 11).collect();
    let mut candidate = valid_candidate();
    candidate
        .as_object_mut()
        .expect("object candidate")
        .insert("family".to_string(), Value::Array(eleven));
    let outcome = validate(&candidate, &clock()).expect("object input");
    let issues = outcome.report.issues_for("family");
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, IssueKind::Range);
}

#[test]
fn all_violations_are_collected_in_one_pass() {
    let candidate = json!({
        "name": "",
        "lastName": "Paredes",
        "nationalId": "1710034066",
        "dateOfBirth": "2015-01-01",
        "gender": "none",
        "hasTaxId": true,
        "hasFarm": false,
        "family": [],
        "hasWorkers": false,
        "hasPregnantWorkers": false
    });
    let outcome = validate(&candidate, &clock()).expect("object input");
    assert!(outcome.record.is_none());
    // name, nationalId, dateOfBirth, gender, taxId, family
    assert_eq!(outcome.report.issue_count(), 6);
    assert_eq!(outcome.report.issues_for("name")[0].kind, IssueKind::Required);
    assert_eq!(
        outcome.report.issues_for("nationalId")[0].kind,
        IssueKind::Checksum
    );
    assert_eq!(
        outcome.report.issues_for("dateOfBirth")[0].kind,
        IssueKind::Range
    );
    assert_eq!(outcome.report.issues_for("gender")[0].kind, IssueKind::Format);
    assert_eq!(outcome.report.issues_for("taxId")[0].kind, IssueKind::Required);
    assert_eq!(outcome.report.issues_for("family")[0].kind, IssueKind::Range);
}

#[test]
fn issue_order_follows_rule_declaration_order() {
    let candidate = json!({
        "lastName": "",
        "hasTaxId": true,
        "hasFarm": false,
        "hasWorkers": false,
        "hasPregnantWorkers": false,
        "family": [
            { "name": "Rosa", "lastName": "Andrade", "nationalId": "1710034065" }
        ]
    });
    let outcome = validate(&candidate, &clock()).expect("object input");
    let fields: Vec<&str> = outcome
        .report
        .issues
        .iter()
        .map(|issue| issue.field.as_str())
        .collect();
    assert_eq!(
        fields,
        vec!["name", "lastName", "nationalId", "dateOfBirth", "gender", "taxId"]
    );
}

#[test]
fn non_object_input_is_a_structural_fault() {
    let fault = validate(&json!([1, 2, 3]), &clock()).expect_err("arrays are not records");
    assert_eq!(fault.got, "an array");
    assert!(validate(&json!("person"), &clock()).is_err());
    assert!(validate(&json!(null), &clock()).is_err());
    assert!(validate(&json!({}), &clock()).is_ok());
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// Addresses a field within a candidate record, including nested sequence
/// elements, e.g. `family[2].nationalId` or `crops[0]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(String);

impl FieldPath {
    pub fn root(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Address an element of a sequence field: `crops` -> `crops[0]`.
    pub fn index(self, idx: usize) -> Self {
        Self(format!("{}[{idx}]", self.0))
    }

    /// Address a field inside a nested object: `family[2]` -> `family[2].nationalId`.
    pub fn child(self, name: &str) -> Self {
        Self(format!("{}.{name}", self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What went wrong with a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    /// Raw value does not match the expected shape (type, length, digits).
    Format,
    /// Correctly shaped id value that fails its check algorithm.
    Checksum,
    /// Numeric or sequence-length value outside its allowed bound.
    Range,
    /// A required field is absent.
    Required,
    /// A cross-field invariant is violated.
    Consistency,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::Format => "format",
            IssueKind::Checksum => "checksum",
            IssueKind::Range => "range",
            IssueKind::Required => "required",
            IssueKind::Consistency => "consistency",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validation finding, tagged to the field it concerns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub field: FieldPath,
    pub kind: IssueKind,
    pub message: String,
}

impl Issue {
    pub fn new(field: FieldPath, kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            field,
            kind,
            message: message.into(),
        }
    }
}

/// The complete, ordered set of findings for one candidate record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn push(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn extend(&mut self, issues: impl IntoIterator<Item = Issue>) {
        self.issues.extend(issues);
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    /// All findings tagged to a field path.
    pub fn issues_for(&self, field: &str) -> Vec<&Issue> {
        self.issues
            .iter()
            .filter(|issue| issue.field.as_str() == field)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_path_addresses_nested_elements() {
        let path = FieldPath::root("family").index(2).child("nationalId");
        assert_eq!(path.as_str(), "family[2].nationalId");
        assert_eq!(FieldPath::root("crops").index(0).as_str(), "crops[0]");
    }

    #[test]
    fn report_counts_and_lookup() {
        let mut report = ValidationReport::default();
        assert!(report.is_clean());
        report.push(Issue::new(
            FieldPath::root("farmName"),
            IssueKind::Required,
            "farmName is required when hasFarm is true",
        ));
        report.push(Issue::new(
            FieldPath::root("totalWorkers"),
            IssueKind::Consistency,
            "menWorkers and womenWorkers must add up to totalWorkers",
        ));
        assert!(!report.is_clean());
        assert_eq!(report.issue_count(), 2);
        assert_eq!(report.issues_for("farmName").len(), 1);
        assert_eq!(report.issues_for("crops").len(), 0);
    }
}

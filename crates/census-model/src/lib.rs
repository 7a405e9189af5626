pub mod error;
pub mod ids;
pub mod person;
pub mod report;

pub use error::{ModelError, Result};
pub use ids::PersonId;
pub use person::{FamilyMember, Gender, Person};
pub use report::{FieldPath, Issue, IssueKind, ValidationReport};

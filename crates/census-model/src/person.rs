//! The person record and its nested types.
//!
//! `Person` is the *normalized* shape: it only exists after a candidate has
//! passed validation, so conditional fields are `None`/empty whenever their
//! controlling boolean is false. Serde names follow the wire casing used by
//! form submissions and the HTTP API (`lastName`, `nationalId`, ...).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ModelError;
use crate::ids::PersonId;

/// Gender of the registered person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }

    /// All accepted wire values, in declaration order.
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(ModelError::InvalidGender(s.to_string())),
        }
    }
}

/// A household member declared alongside the main record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMember {
    pub name: String,
    pub last_name: String,
    pub national_id: String,
}

/// A validated census record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<PersonId>,

    pub name: String,
    pub last_name: String,
    pub national_id: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,

    pub has_tax_id: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,

    pub has_farm: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farm_area_hectares: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farm_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub crops: Vec<String>,

    pub family: Vec<FamilyMember>,

    pub has_workers: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_workers: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub men_workers: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub women_workers: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub over18_workers: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub under18_workers: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minor_workers_occupation: Option<String>,

    pub has_pregnant_workers: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pregnant_workers: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pregnant_workers_occupation: Option<String>,
}

impl Person {
    /// The canonical store id for this record.
    pub fn canonical_id(&self) -> PersonId {
        PersonId::from_national_id(&self.national_id)
    }

    /// Attach the canonical id, returning the updated record.
    pub fn with_canonical_id(mut self) -> Self {
        self.id = Some(self.canonical_id());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_parses_known_values() {
        assert_eq!("male".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!(" FEMALE ".parse::<Gender>().unwrap(), Gender::Female);
        assert!("unknown".parse::<Gender>().is_err());
    }

    #[test]
    fn gender_serializes_lowercase() {
        let json = serde_json::to_string(&Gender::Other).unwrap();
        assert_eq!(json, "\"other\"");
    }
}

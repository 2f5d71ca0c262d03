//! Congratulatory-letter request model
//!
//! The letter server takes a JSON description of the recipient and a date
//! and answers with a link to the rendered PDF. This module holds the
//! payload types and the file name under which the PDF is saved.

pub mod date;
pub mod form;

pub use date::{format_long_ru, parse_letter_date};
pub use form::{LetterForm, RecipientField};

use crate::Error;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Suffix of the downloaded PDF name.
pub const FILE_SUFFIX: &str = " благодарственное письмо.pdf";

/// Whether the letter is addressed to a person or an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    #[default]
    Individual,
    LegalEntity,
}

impl FromStr for EntityType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "individual" => Ok(EntityType::Individual),
            "legal_entity" | "legal-entity" => Ok(EntityType::LegalEntity),
            other => Err(Error::ValidationError(format!("unknown entity type '{}'", other))),
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityType::Individual => "individual",
            EntityType::LegalEntity => "legal_entity",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Male,
    Female,
}

impl Gender {
    /// Salutation printed above the recipient's name.
    pub fn salutation(&self) -> &'static str {
        match self {
            Gender::Male => "Уважаемый",
            Gender::Female => "Уважаемая",
        }
    }
}

impl FromStr for Gender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            other => Err(Error::ValidationError(format!("unknown gender '{}'", other))),
        }
    }
}

/// Recipient fields; the shape depends on the entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Recipient {
    #[serde(rename_all = "camelCase")]
    Individual {
        last_name: String,
        first_name: String,
        middle_name: String,
        gender: Gender,
    },
    #[serde(rename_all = "camelCase")]
    LegalEntity { company_name: String },
}

impl Recipient {
    pub fn entity_type(&self) -> EntityType {
        match self {
            Recipient::Individual { .. } => EntityType::Individual,
            Recipient::LegalEntity { .. } => EntityType::LegalEntity,
        }
    }

    /// Last name for a person, company name for an organization.
    pub fn display_name(&self) -> &str {
        match self {
            Recipient::Individual { last_name, .. } => last_name,
            Recipient::LegalEntity { company_name } => company_name,
        }
    }
}

/// Body of `POST /generate_letter`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LetterRequest {
    pub entity_type: EntityType,
    /// `DD.MM.YYYY`
    pub date: String,
    pub recipient: Recipient,
}

impl LetterRequest {
    pub fn new(date: NaiveDate, recipient: Recipient) -> Self {
        Self {
            entity_type: recipient.entity_type(),
            date: date.format(date::DATE_FORMAT).to_string(),
            recipient,
        }
    }

    /// Name under which the generated PDF is saved.
    pub fn file_name(&self) -> String {
        let name: String = self
            .recipient
            .display_name()
            .trim()
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        format!("{}{}", name, FILE_SUFFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()
    }

    #[test]
    fn individual_payload_shape() {
        let req = LetterRequest::new(
            date(),
            Recipient::Individual {
                last_name: "Петров".into(),
                first_name: "Петр".into(),
                middle_name: "Петрович".into(),
                gender: Gender::Male,
            },
        );
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "entityType": "individual",
                "date": "01.01.1990",
                "recipient": {
                    "lastName": "Петров",
                    "firstName": "Петр",
                    "middleName": "Петрович",
                    "gender": "male"
                }
            })
        );
        assert_eq!(req.file_name(), "Петров благодарственное письмо.pdf");
    }

    #[test]
    fn legal_entity_payload_shape() {
        let req = LetterRequest::new(
            date(),
            Recipient::LegalEntity { company_name: "Завод «Норникель»".into() },
        );
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "entityType": "legal_entity",
                "date": "01.01.1990",
                "recipient": { "companyName": "Завод «Норникель»" }
            })
        );
        assert_eq!(req.file_name(), "Завод «Норникель» благодарственное письмо.pdf");
    }

    #[test]
    fn file_name_stays_a_single_component() {
        let req = LetterRequest::new(date(), Recipient::LegalEntity { company_name: "ООО A/B".into() });
        assert_eq!(req.file_name(), "ООО A_B благодарственное письмо.pdf");
    }

    #[test]
    fn entity_type_and_gender_parse() {
        assert_eq!("legal_entity".parse::<EntityType>().unwrap(), EntityType::LegalEntity);
        assert_eq!("female".parse::<Gender>().unwrap(), Gender::Female);
        assert!("robot".parse::<Gender>().is_err());
        assert_eq!(Gender::Female.salutation(), "Уважаемая");
    }
}

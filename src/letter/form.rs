//! Recipient form state

use super::date::parse_letter_date;
use super::{EntityType, Gender, LetterRequest, Recipient};
use crate::{Error, Result};
use chrono::NaiveDate;

/// Editable recipient field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipientField {
    LastName,
    FirstName,
    MiddleName,
    CompanyName,
}

/// Form contents. Every field is kept regardless of entity type; only the
/// ones relevant to the selected type end up in the request.
///
/// Transitions consume the form and return the next value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LetterForm {
    pub entity_type: EntityType,
    pub last_name: String,
    pub first_name: String,
    pub middle_name: String,
    pub company_name: String,
    pub gender: Gender,
    pub date: String,
}

impl LetterForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch entity type. Recipient fields are reset.
    pub fn with_entity_type(self, entity_type: EntityType) -> Self {
        Self {
            entity_type,
            last_name: String::new(),
            first_name: String::new(),
            middle_name: String::new(),
            company_name: String::new(),
            ..self
        }
    }

    pub fn with_field(mut self, field: RecipientField, value: impl Into<String>) -> Self {
        let value = value.into();
        match field {
            RecipientField::LastName => self.last_name = value,
            RecipientField::FirstName => self.first_name = value,
            RecipientField::MiddleName => self.middle_name = value,
            RecipientField::CompanyName => self.company_name = value,
        }
        self
    }

    pub fn with_gender(self, gender: Gender) -> Self {
        Self { gender, ..self }
    }

    pub fn with_date(self, date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            ..self
        }
    }

    /// Validate and build the request body. Nothing is sent on error.
    pub fn to_request(&self, today: NaiveDate) -> Result<LetterRequest> {
        let date = parse_letter_date(&self.date, today)?;

        let recipient = match self.entity_type {
            EntityType::Individual => Recipient::Individual {
                last_name: self.last_name.trim().to_string(),
                first_name: self.first_name.trim().to_string(),
                middle_name: self.middle_name.trim().to_string(),
                gender: self.gender,
            },
            EntityType::LegalEntity => Recipient::LegalEntity {
                company_name: self.company_name.trim().to_string(),
            },
        };
        if recipient.display_name().is_empty() {
            let what = match self.entity_type {
                EntityType::Individual => "last name",
                EntityType::LegalEntity => "company name",
            };
            return Err(Error::ValidationError(format!("recipient {} is required", what)));
        }

        Ok(LetterRequest::new(date, recipient))
    }
}

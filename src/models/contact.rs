//! Contact model and its create/update inputs.

use crate::domain::schema::{self, COMPANY, EMAIL, FIRST_NAME, JOB_TITLE, LAST_NAME, PHONE_NUMBER};
use crate::domain::{ContactId, EmailAddress, FieldErrors, PhoneNumber};
use serde::{Deserialize, Serialize};

/// A contact record as persisted and exchanged over the wire.
///
/// Fields use camelCase on the wire. `_id` is accepted for `id` when decoding
/// so records from document stores load unchanged; extra keys are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// Store-assigned identifier, immutable after creation
    #[serde(alias = "_id")]
    pub id: ContactId,

    pub first_name: String,

    pub last_name: String,

    /// Unique among active contacts
    pub email: EmailAddress,

    /// Unique among active contacts
    pub phone_number: PhoneNumber,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

impl Contact {
    /// Value of a field by its wire name. `id` is included.
    ///
    /// Returns `None` for unset optional fields and unknown names.
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "id" => Some(self.id.as_str()),
            FIRST_NAME => Some(self.first_name.as_str()),
            LAST_NAME => Some(self.last_name.as_str()),
            EMAIL => Some(self.email.as_str()),
            PHONE_NUMBER => Some(self.phone_number.as_str()),
            JOB_TITLE => self.job_title.as_deref(),
            COMPANY => self.company.as_deref(),
            _ => None,
        }
    }

    /// Present fields in wire order, `id` first, unset optionals skipped.
    ///
    /// Matches the key order of the JSON encoding.
    pub fn present_fields(&self) -> Vec<(&'static str, &str)> {
        ["id", FIRST_NAME, LAST_NAME, EMAIL, PHONE_NUMBER, JOB_TITLE, COMPANY]
            .into_iter()
            .filter_map(|name| self.field(name).map(|value| (name, value)))
            .collect()
    }

    /// The text fields free-text search runs over.
    pub fn searchable_fields(&self) -> impl Iterator<Item = &str> {
        [
            Some(self.first_name.as_str()),
            Some(self.last_name.as_str()),
            Some(self.email.as_str()),
            Some(self.phone_number.as_str()),
            self.company.as_deref(),
            self.job_title.as_deref(),
        ]
        .into_iter()
        .flatten()
    }

    /// "First Last", trimmed.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

fn trimmed(value: &str) -> String {
    value.trim().to_string()
}

fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Input for creating a contact.
///
/// Missing keys decode as blank so validation, not decoding, reports them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

impl ContactFields {
    /// Fields with the four required values set.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone_number: phone_number.into(),
            job_title: None,
            company: None,
        }
    }

    pub fn with_job_title(mut self, job_title: impl Into<String>) -> Self {
        self.job_title = Some(job_title.into());
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    /// Value of a field by its wire name.
    pub fn get(&self, name: &str) -> Option<&str> {
        match name {
            FIRST_NAME => Some(self.first_name.as_str()),
            LAST_NAME => Some(self.last_name.as_str()),
            EMAIL => Some(self.email.as_str()),
            PHONE_NUMBER => Some(self.phone_number.as_str()),
            JOB_TITLE => self.job_title.as_deref(),
            COMPANY => self.company.as_deref(),
            _ => None,
        }
    }

    /// Check every field against the schema.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        schema::validate_record(|name| self.get(name))
    }

    /// Validate and build the record the store will hold under `id`.
    pub fn into_contact(self, id: ContactId) -> Result<Contact, FieldErrors> {
        self.validate()?;
        build_contact(id, &self)
    }
}

/// Partial update: `None` leaves a field unchanged.
///
/// Setting an optional field to blank clears it; setting a required field to
/// blank fails validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

impl ContactPatch {
    /// Value the patch sets for a field, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        match name {
            FIRST_NAME => self.first_name.as_deref(),
            LAST_NAME => self.last_name.as_deref(),
            EMAIL => self.email.as_deref(),
            PHONE_NUMBER => self.phone_number.as_deref(),
            JOB_TITLE => self.job_title.as_deref(),
            COMPANY => self.company.as_deref(),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Check the supplied fields against the schema.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        schema::validate_partial(|name| self.get(name))
    }

    /// Merge onto `current`, keeping its id.
    pub fn apply_to(&self, current: &Contact) -> Result<Contact, FieldErrors> {
        self.validate()?;

        let merged = ContactFields {
            first_name: self
                .first_name
                .clone()
                .unwrap_or_else(|| current.first_name.clone()),
            last_name: self
                .last_name
                .clone()
                .unwrap_or_else(|| current.last_name.clone()),
            email: self
                .email
                .clone()
                .unwrap_or_else(|| current.email.as_str().to_string()),
            phone_number: self
                .phone_number
                .clone()
                .unwrap_or_else(|| current.phone_number.as_str().to_string()),
            job_title: self.job_title.clone().or_else(|| current.job_title.clone()),
            company: self.company.clone().or_else(|| current.company.clone()),
        };

        build_contact(current.id.clone(), &merged)
    }
}

impl From<&Contact> for ContactFields {
    fn from(contact: &Contact) -> Self {
        Self {
            first_name: contact.first_name.clone(),
            last_name: contact.last_name.clone(),
            email: contact.email.as_str().to_string(),
            phone_number: contact.phone_number.as_str().to_string(),
            job_title: contact.job_title.clone(),
            company: contact.company.clone(),
        }
    }
}

fn message_for(field: &str) -> &'static str {
    schema::rule_for(field)
        .map(|rule| rule.message)
        .unwrap_or("Invalid value.")
}

fn build_contact(id: ContactId, fields: &ContactFields) -> Result<Contact, FieldErrors> {
    let mut errors = FieldErrors::new();

    let email = EmailAddress::new(fields.email.as_str());
    let phone_number = PhoneNumber::new(fields.phone_number.as_str());

    if email.is_err() {
        errors.insert(EMAIL, message_for(EMAIL));
    }
    if phone_number.is_err() {
        errors.insert(PHONE_NUMBER, message_for(PHONE_NUMBER));
    }

    // Schema validation ran first; this only fails if the patterns disagree.
    match (email, phone_number) {
        (Ok(email), Ok(phone_number)) => Ok(Contact {
            id,
            first_name: trimmed(&fields.first_name),
            last_name: trimmed(&fields.last_name),
            email,
            phone_number,
            job_title: optional_text(fields.job_title.as_deref()),
            company: optional_text(fields.company.as_deref()),
        }),
        _ => Err(errors),
    }
}

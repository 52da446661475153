//! Declarative contact field schema.
//!
//! Every contact field is described once here: whether it is required, the
//! predicate its (trimmed, non-empty) value must satisfy, and the message shown
//! when it does not. Client pre-checks and the authoritative store both evaluate
//! the same table.

use super::errors::FieldErrors;
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern is valid"));

// `\d` would admit non-ASCII digits.
static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("phone pattern is valid"));

// Wire names, in display order.
pub const FIRST_NAME: &str = "firstName";
pub const LAST_NAME: &str = "lastName";
pub const EMAIL: &str = "email";
pub const PHONE_NUMBER: &str = "phoneNumber";
pub const JOB_TITLE: &str = "jobTitle";
pub const COMPANY: &str = "company";

/// Validation rule for a single contact field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    /// Wire name of the field
    pub name: &'static str,

    /// Whether a blank or missing value is rejected
    pub required: bool,

    /// Predicate applied to non-blank values
    pub validate: fn(&str) -> bool,

    /// Message reported when the rule fails
    pub message: &'static str,
}

impl FieldRule {
    /// Check one value against this rule.
    ///
    /// `None` and whitespace-only values count as missing. Present values are
    /// trimmed before the predicate runs.
    pub fn check(&self, value: Option<&str>) -> Result<(), &'static str> {
        match value.filter(|v| !v.trim().is_empty()) {
            None if self.required => Err(self.message),
            None => Ok(()),
            Some(v) if (self.validate)(v.trim()) => Ok(()),
            Some(_) => Err(self.message),
        }
    }
}

fn any_text(_: &str) -> bool {
    true
}

/// Whether `email` has the `local@domain.tld` shape.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Whether `phone` is exactly ten ASCII digits.
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_PATTERN.is_match(phone)
}

/// The contact schema.
pub static CONTACT_SCHEMA: [FieldRule; 6] = [
    FieldRule {
        name: FIRST_NAME,
        required: true,
        validate: any_text,
        message: "First name is required.",
    },
    FieldRule {
        name: LAST_NAME,
        required: true,
        validate: any_text,
        message: "Last name is required.",
    },
    FieldRule {
        name: EMAIL,
        required: true,
        validate: is_valid_email,
        message: "Valid email is required.",
    },
    FieldRule {
        name: PHONE_NUMBER,
        required: true,
        validate: is_valid_phone,
        message: "Valid phone number (10 digits) is required.",
    },
    FieldRule {
        name: JOB_TITLE,
        required: false,
        validate: any_text,
        message: "Job title is invalid.",
    },
    FieldRule {
        name: COMPANY,
        required: false,
        validate: any_text,
        message: "Company is invalid.",
    },
];

/// Look up the rule for a wire field name.
pub fn rule_for(field: &str) -> Option<&'static FieldRule> {
    CONTACT_SCHEMA.iter().find(|rule| rule.name == field)
}

/// Validate a complete record, reading each field through `lookup`.
pub fn validate_record<'a>(lookup: impl Fn(&str) -> Option<&'a str>) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    for rule in CONTACT_SCHEMA.iter() {
        if let Err(message) = rule.check(lookup(rule.name)) {
            errors.insert(rule.name, message);
        }
    }
    errors.into_result()
}

/// Validate only the fields a partial update supplies.
///
/// `lookup` returns `None` for fields the patch leaves untouched and
/// `Some(value)` for fields it sets. A required field set to blank fails.
pub fn validate_partial<'a>(
    lookup: impl Fn(&str) -> Option<&'a str>,
) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    for rule in CONTACT_SCHEMA.iter() {
        if let Some(value) = lookup(rule.name) {
            if let Err(message) = rule.check(Some(value)) {
                errors.insert(rule.name, message);
            }
        }
    }
    errors.into_result()
}

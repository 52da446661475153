//! HTTP client for a remote contact store.
//!
//! Speaks the REST surface `GET/POST /contacts`, `GET/PUT/DELETE /contacts/:id`
//! with camelCase JSON bodies. The client is synchronous (`ureq`) and is driven
//! from async code through [`AsyncContactsClientImpl`], which runs each call on
//! tokio's blocking pool.

mod async_wrapper;
pub use async_wrapper::{AsyncContactsClient, AsyncContactsClientImpl};

use crate::domain::{schema::CONTACT_SCHEMA, ContactId, FieldErrors};
use crate::error::{DirectoryError, DirectoryResult, DuplicateField};
use crate::metrics::{HttpTimer, Metrics};
use crate::models::{Contact, ContactFields, ContactPatch};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Wrapped list response, accepted alongside a bare array.
#[derive(Debug, Deserialize)]
pub struct ContactsResponse {
    pub contacts: Vec<Contact>,
}

/// Body of a 409 response, when the store names the colliding field.
#[derive(Debug, Deserialize)]
struct ConflictBody {
    #[serde(default)]
    field: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Blocking client for the contact store REST surface.
#[derive(Clone)]
pub struct ContactsClient {
    base_url: String,
    agent: Arc<ureq::Agent>,
    metrics: Metrics,
}

impl ContactsClient {
    /// Create a client for `base_url` with the given per-request timeout.
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(request_timeout).build();

        Self {
            base_url: base_url.into(),
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        }
    }

    /// Create a client with a 10 second timeout (useful for testing).
    #[doc(hidden)]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::new(base_url, Duration::from_secs(10))
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    fn build_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    fn contact_path(id: &ContactId) -> String {
        format!("/contacts/{}", urlencoding::encode(id.as_str()))
    }

    /// Send one request, recording metrics and mapping failures.
    ///
    /// `target` is the id the request addresses; a 404 maps to `NotFound` only
    /// when one is given.
    fn execute(
        &self,
        method: &str,
        path: &str,
        body: Option<&serde_json::Value>,
        target: Option<&ContactId>,
    ) -> DirectoryResult<ureq::Response> {
        let url = self.build_url(path);
        tracing::debug!("{} {}", method, url);

        let timer = HttpTimer::new(self.metrics.clone());
        let request = self
            .agent
            .request(method, &url)
            .set("Accept", "application/json");

        let result = match body {
            Some(body) => request.send_json(body),
            None => request.call(),
        };

        match result {
            Ok(response) => {
                tracing::debug!("{} {} - Success (status: {})", method, url, response.status());
                timer.complete();
                Ok(response)
            }
            Err(e) => {
                timer.complete_with_error();
                let err = Self::map_error(e, target);
                match &err {
                    DirectoryError::Transport(_) => {
                        tracing::error!("{} {} - Error: {}", method, url, err)
                    }
                    _ => tracing::debug!("{} {} - Rejected: {}", method, url, err),
                }
                Err(err)
            }
        }
    }

    /// Map a ureq error onto the directory error taxonomy.
    fn map_error(error: ureq::Error, target: Option<&ContactId>) -> DirectoryError {
        match error {
            ureq::Error::Status(code, response) => {
                let body = response
                    .into_string()
                    .unwrap_or_else(|_| "Unknown error".to_string());

                match (code, target) {
                    (400, _) => DirectoryError::Validation(field_errors_from_body(&body)),
                    (404, Some(id)) => DirectoryError::NotFound(id.clone()),
                    (409, _) => duplicate_from_body(&body),
                    _ => DirectoryError::Transport(format!(
                        "unexpected status {}: {}",
                        code, body
                    )),
                }
            }
            ureq::Error::Transport(transport) => DirectoryError::Transport(transport.to_string()),
        }
    }

    fn read_body(response: ureq::Response) -> DirectoryResult<String> {
        response
            .into_string()
            .map_err(|e| DirectoryError::Transport(e.to_string()))
    }

    /// Fetch every contact, in store order.
    pub fn list_contacts(&self) -> DirectoryResult<Vec<Contact>> {
        let response = self.execute("GET", "/contacts", None, None)?;
        let body = Self::read_body(response)?;

        // Bare array or `{"contacts": [...]}`; errors are reported for the shape sent
        let contacts = if body.trim_start().starts_with('[') {
            serde_json::from_str::<Vec<Contact>>(&body)?
        } else {
            serde_json::from_str::<ContactsResponse>(&body)?.contacts
        };

        self.metrics.record_contacts_fetched(contacts.len());
        Ok(contacts)
    }

    /// Fetch a single contact.
    pub fn get_contact(&self, id: &ContactId) -> DirectoryResult<Contact> {
        let response = self.execute("GET", &Self::contact_path(id), None, Some(id))?;
        let body = Self::read_body(response)?;
        let contact: Contact = serde_json::from_str(&body)?;

        self.metrics.record_contacts_fetched(1);
        Ok(contact)
    }

    /// Create a contact; the store assigns its id.
    pub fn create_contact(&self, fields: &ContactFields) -> DirectoryResult<Contact> {
        let body = serde_json::to_value(fields)?;
        let response = self.execute("POST", "/contacts", Some(&body), None)?;
        let contact: Contact = serde_json::from_str(&Self::read_body(response)?)?;

        self.metrics.record_contact_mutated();
        Ok(contact)
    }

    /// Apply a partial update and return the merged record.
    pub fn update_contact(&self, id: &ContactId, patch: &ContactPatch) -> DirectoryResult<Contact> {
        let body = serde_json::to_value(patch)?;
        let response = self.execute("PUT", &Self::contact_path(id), Some(&body), Some(id))?;
        let contact: Contact = serde_json::from_str(&Self::read_body(response)?)?;

        self.metrics.record_contact_mutated();
        Ok(contact)
    }

    /// Delete a contact.
    pub fn delete_contact(&self, id: &ContactId) -> DirectoryResult<()> {
        self.execute("DELETE", &Self::contact_path(id), None, Some(id))?;
        self.metrics.record_contact_mutated();
        Ok(())
    }
}

/// Recover per-field failures from a 400 body.
///
/// Recognises schema field names either at the top level or under `errors`;
/// the schema's own message is used for each. Anything else is reported
/// against the record as a whole.
fn field_errors_from_body(body: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        let fields = value.get("errors").unwrap_or(&value);
        for rule in CONTACT_SCHEMA.iter() {
            if fields.get(rule.name).is_some() {
                errors.insert(rule.name, rule.message);
            }
        }
    }

    if errors.is_empty() {
        errors.insert("contact", "Rejected by the contact store.");
    }
    errors
}

fn duplicate_from_body(body: &str) -> DirectoryError {
    let parsed = serde_json::from_str::<ConflictBody>(body).ok();

    let field = match parsed.as_ref().and_then(|c| c.field.as_deref()) {
        Some("email") => DuplicateField::Email,
        Some("phoneNumber") => DuplicateField::PhoneNumber,
        _ => DuplicateField::EmailOrPhone,
    };
    let detail = parsed
        .and_then(|c| c.message)
        .unwrap_or_else(|| body.trim().to_string());

    DirectoryError::duplicate(field, detail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_joins_slashes() {
        let client = ContactsClient::with_base_url("http://localhost:5000/");
        assert_eq!(
            client.build_url("/contacts"),
            "http://localhost:5000/contacts"
        );
    }

    #[test]
    fn test_contact_path_encodes_id() {
        let id = ContactId::new("a b/c").unwrap();
        assert_eq!(ContactsClient::contact_path(&id), "/contacts/a%20b%2Fc");
    }

    #[test]
    fn test_field_errors_from_body() {
        let errors = field_errors_from_body(r#"{"errors": {"email": "bad"}}"#);
        assert_eq!(errors.get("email"), Some("Valid email is required."));

        let errors = field_errors_from_body("Bad Request");
        assert_eq!(errors.get("contact"), Some("Rejected by the contact store."));
    }

    #[test]
    fn test_duplicate_from_body() {
        let err = duplicate_from_body(r#"{"field": "phoneNumber", "message": "taken"}"#);
        assert!(matches!(
            err,
            DirectoryError::Duplicate {
                field: DuplicateField::PhoneNumber,
                ref value,
            } if value == "taken"
        ));

        let err = duplicate_from_body("Conflict");
        assert!(matches!(
            err,
            DirectoryError::Duplicate {
                field: DuplicateField::EmailOrPhone,
                ..
            }
        ));
    }
}

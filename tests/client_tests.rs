//! Integration tests for the ContactsClient using mockito for HTTP mocking.

use contact_directory::client::{AsyncContactsClient, AsyncContactsClientImpl};
use contact_directory::repositories::{ContactRepository, HttpContactRepository};
use contact_directory::{
    ContactFields, ContactId, ContactPatch, ContactsClient, DirectoryError, DuplicateField,
};
use mockito::{Matcher, Server};
use std::sync::Arc;

const JOHN: &str = r#"{
    "id": "65a1f0c2e4b0a1b2c3d4e5f6",
    "firstName": "John",
    "lastName": "Doe",
    "email": "john@example.com",
    "phoneNumber": "5551234567",
    "company": "Acme"
}"#;

fn john_id() -> ContactId {
    ContactId::new("65a1f0c2e4b0a1b2c3d4e5f6").unwrap()
}

#[test]
fn test_list_contacts_bare_array() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/contacts")
        .match_header("accept", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!("[{}]", JOHN))
        .create();

    let client = ContactsClient::with_base_url(server.url());
    let contacts = client.list_contacts().unwrap();

    mock.assert();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].id, john_id());
    assert_eq!(contacts[0].company.as_deref(), Some("Acme"));
    assert_eq!(client.metrics().contacts_fetched_total(), 1);
}

#[test]
fn test_list_contacts_wrapped_with_document_ids() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/contacts")
        .with_status(200)
        .with_body(
            r#"{"contacts": [{
                "_id": "abc123",
                "firstName": "Jane",
                "lastName": "Roe",
                "email": "jane@example.com",
                "phoneNumber": "5559876543",
                "__v": 0
            }]}"#,
        )
        .create();

    let client = ContactsClient::with_base_url(server.url());
    let contacts = client.list_contacts().unwrap();

    mock.assert();
    assert_eq!(contacts[0].id.as_str(), "abc123");
}

#[test]
fn test_list_contacts_bad_record_reports_its_own_error() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/contacts")
        .with_status(200)
        .with_body(
            r#"[{
                "id": "65a1f0c2e4b0a1b2c3d4e5f6",
                "firstName": "John",
                "lastName": "Doe",
                "email": "john@example.com",
                "phoneNumber": "555-1234"
            }]"#,
        )
        .create();

    let client = ContactsClient::with_base_url(server.url());
    let err = client.list_contacts().unwrap_err();

    mock.assert();
    match err {
        DirectoryError::Json(e) => {
            let message = e.to_string();
            assert!(message.contains("Invalid phone number: 555-1234"), "{}", message);
            assert!(!message.contains("contacts"), "{}", message);
            assert!(!message.contains("expected struct"), "{}", message);
        }
        other => panic!("expected a JSON error, got {:?}", other),
    }
}

#[test]
fn test_get_contact() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/contacts/65a1f0c2e4b0a1b2c3d4e5f6")
        .with_status(200)
        .with_body(JOHN)
        .create();

    let client = ContactsClient::with_base_url(server.url());
    let contact = client.get_contact(&john_id()).unwrap();

    mock.assert();
    assert_eq!(contact.display_name(), "John Doe");
}

#[test]
fn test_get_contact_not_found() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/contacts/65a1f0c2e4b0a1b2c3d4e5f6")
        .with_status(404)
        .with_body("Contact not found")
        .create();

    let client = ContactsClient::with_base_url(server.url());
    let err = client.get_contact(&john_id()).unwrap_err();

    mock.assert();
    assert!(matches!(err, DirectoryError::NotFound(id) if id == john_id()));
    assert_eq!(client.metrics().http_errors_total(), 1);
}

#[test]
fn test_create_contact_sends_camel_case_body() {
    let mut server = Server::new();

    let mock = server
        .mock("POST", "/contacts")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "firstName": "John",
            "lastName": "Doe",
            "email": "john@example.com",
            "phoneNumber": "5551234567",
            "company": "Acme"
        })))
        .with_status(201)
        .with_body(JOHN)
        .create();

    let client = ContactsClient::with_base_url(server.url());
    let fields =
        ContactFields::new("John", "Doe", "john@example.com", "5551234567").with_company("Acme");
    let contact = client.create_contact(&fields).unwrap();

    mock.assert();
    assert_eq!(contact.id, john_id());
    assert_eq!(client.metrics().contacts_mutated_total(), 1);
}

#[test]
fn test_create_contact_conflict_maps_to_duplicate() {
    let mut server = Server::new();

    let mock = server
        .mock("POST", "/contacts")
        .with_status(409)
        .with_body(r#"{"field": "email", "message": "john@example.com"}"#)
        .create();

    let client = ContactsClient::with_base_url(server.url());
    let fields = ContactFields::new("John", "Doe", "john@example.com", "5551234567");
    let err = client.create_contact(&fields).unwrap_err();

    mock.assert();
    match err {
        DirectoryError::Duplicate { field, value } => {
            assert_eq!(field, DuplicateField::Email);
            assert_eq!(value, "john@example.com");
        }
        other => panic!("Expected Duplicate error, got: {:?}", other),
    }
}

#[test]
fn test_create_contact_bad_request_maps_to_validation() {
    let mut server = Server::new();

    let mock = server
        .mock("POST", "/contacts")
        .with_status(400)
        .with_body(r#"{"errors": {"phoneNumber": "invalid"}}"#)
        .create();

    let client = ContactsClient::with_base_url(server.url());
    let fields = ContactFields::new("John", "Doe", "john@example.com", "5551234567");
    let err = client.create_contact(&fields).unwrap_err();

    mock.assert();
    match err {
        DirectoryError::Validation(errors) => assert_eq!(
            errors.get("phoneNumber"),
            Some("Valid phone number (10 digits) is required.")
        ),
        other => panic!("Expected Validation error, got: {:?}", other),
    }
}

#[test]
fn test_update_contact_sends_only_patched_fields() {
    let mut server = Server::new();

    let mock = server
        .mock("PUT", "/contacts/65a1f0c2e4b0a1b2c3d4e5f6")
        .match_body(Matcher::Json(serde_json::json!({ "jobTitle": "CTO" })))
        .with_status(200)
        .with_body(JOHN.replace("\"company\"", "\"jobTitle\": \"CTO\", \"company\""))
        .create();

    let client = ContactsClient::with_base_url(server.url());
    let patch = ContactPatch {
        job_title: Some("CTO".to_string()),
        ..Default::default()
    };
    let contact = client.update_contact(&john_id(), &patch).unwrap();

    mock.assert();
    assert_eq!(contact.job_title.as_deref(), Some("CTO"));
}

#[test]
fn test_delete_contact() {
    let mut server = Server::new();

    let mock = server
        .mock("DELETE", "/contacts/65a1f0c2e4b0a1b2c3d4e5f6")
        .with_status(204)
        .create();

    let client = ContactsClient::with_base_url(server.url());
    client.delete_contact(&john_id()).unwrap();

    mock.assert();
}

#[test]
fn test_server_error_maps_to_transport() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/contacts")
        .with_status(500)
        .with_body("Internal Server Error")
        .create();

    let client = ContactsClient::with_base_url(server.url());
    let err = client.list_contacts().unwrap_err();

    mock.assert();
    assert!(matches!(err, DirectoryError::Transport(_)));
}

#[test]
fn test_unreachable_store_maps_to_transport() {
    // Nothing listens on port 9 locally
    let client = ContactsClient::with_base_url("http://127.0.0.1:9");
    let err = client.list_contacts().unwrap_err();
    assert!(matches!(err, DirectoryError::Transport(_)));
}

#[tokio::test]
async fn test_http_repository_over_async_client() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("DELETE", "/contacts/65a1f0c2e4b0a1b2c3d4e5f6")
        .with_status(404)
        .create_async()
        .await;

    let client = Arc::new(AsyncContactsClientImpl::new(ContactsClient::with_base_url(
        server.url(),
    ))) as Arc<dyn AsyncContactsClient>;
    let repo = HttpContactRepository::new(client);

    let err = repo.delete(&john_id()).await.unwrap_err();

    mock.assert_async().await;
    assert!(err.is_not_found());
}

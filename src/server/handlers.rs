//! MCP tool handlers for the contact directory.
//!
//! This module exposes one [`ContactSession`] through the rmcp SDK's
//! tool_router pattern.

use crate::domain::ContactId;
use crate::error::DirectoryError;
use crate::export::ExportFormat;
use crate::models::{ContactFields, ContactPatch};
use crate::session::ContactSession;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use schemars::JsonSchema;
use serde::Deserialize;
use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

/// The MCP server fronting one contact session.
#[derive(Clone)]
pub struct ContactDirectoryServer {
    session: Arc<Mutex<ContactSession>>,
    export_dir: PathBuf,
    tool_router: ToolRouter<Self>,
}

#[tool_handler]
impl ServerHandler for ContactDirectoryServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities {
                tools: Some(Default::default()),
                ..Default::default()
            },
            server_info: Implementation {
                name: "contact-directory".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some("Contact directory - search, create, update and delete contacts with unique email and phone numbers, select contacts across pages, bulk delete and export them as JSON or CSV.".into()),
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ListContactsParams {
    #[serde(default)]
    filter: Option<String>,
    #[serde(default)]
    page: Option<usize>,
    #[serde(default)]
    page_size: Option<usize>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ContactIdParams {
    contact_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct CreateContactParams {
    first_name: String,
    last_name: String,
    email: String,
    phone_number: String,
    #[serde(default)]
    job_title: Option<String>,
    #[serde(default)]
    company: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct UpdateContactParams {
    contact_id: String,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone_number: Option<String>,
    #[serde(default)]
    job_title: Option<String>,
    #[serde(default)]
    company: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct SelectContactsParams {
    contact_ids: Vec<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ExportParams {
    /// "json" or "csv"
    format: String,
}

// Caller mistakes are invalid params; everything else is internal
fn to_mcp_error(e: DirectoryError) -> McpError {
    let code = match &e {
        DirectoryError::Validation(_)
        | DirectoryError::Duplicate { .. }
        | DirectoryError::NotFound(_)
        | DirectoryError::NotInView(_) => ErrorCode::INVALID_PARAMS,
        _ => ErrorCode::INTERNAL_ERROR,
    };

    McpError {
        code,
        message: Cow::from(e.to_string()),
        data: None,
    }
}

fn internal_error(e: impl std::fmt::Display) -> McpError {
    McpError {
        code: ErrorCode::INTERNAL_ERROR,
        message: Cow::from(e.to_string()),
        data: None,
    }
}

fn parse_id(raw: &str) -> Result<ContactId, McpError> {
    ContactId::new(raw).map_err(|e| McpError {
        code: ErrorCode::INVALID_PARAMS,
        message: Cow::from(e.to_string()),
        data: None,
    })
}

fn json_result(value: &impl serde::Serialize) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(value).map_err(internal_error)?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

fn selection_json(session: &ContactSession) -> serde_json::Value {
    serde_json::json!({
        "selected_ids": session.selected_ids(),
        "all_selected": session.all_selected(),
    })
}

#[tool_router]
impl ContactDirectoryServer {
    /// Create a server over an already loaded session.
    pub fn new(session: ContactSession, export_dir: PathBuf) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            export_dir,
            tool_router: Self::tool_router(),
        }
    }

    /// List one page of contacts matching the current filter.
    #[tool(
        description = "List contacts. Optional filter is a case-insensitive substring matched against name, email, phone, company and job title; changing it returns to page 0 and drops hidden selections. Page is zero-based."
    )]
    async fn list_contacts(
        &self,
        params: Parameters<ListContactsParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let mut session = self.session.lock().await;

        if let Some(filter) = params.filter {
            if filter != session.filter() {
                session.set_filter(filter);
            }
        }
        if let Some(page_size) = params.page_size {
            session.set_page_size(page_size);
        }
        if let Some(page) = params.page {
            session.set_page(page);
        }

        let page = session.current_page();
        json_result(&serde_json::json!({
            "filter": session.filter(),
            "page": page.page,
            "page_size": page.page_size,
            "page_count": page.page_count(),
            "total": page.total,
            "contacts": page.items,
            "selection": selection_json(&session),
        }))
    }

    /// Retrieve a contact from the store by ID.
    #[tool(description = "Retrieve complete information for a specific contact by ID")]
    async fn get_contact(
        &self,
        params: Parameters<ContactIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let id = parse_id(&params.0.contact_id)?;

        let contact = self
            .session
            .lock()
            .await
            .get(&id)
            .await
            .map_err(to_mcp_error)?;

        json_result(&contact)
    }

    /// Create a contact. Email and phone must not belong to another contact.
    #[tool(
        description = "Create a contact. First name, last name, a valid email and a 10-digit phone number are required; email and phone must be unique."
    )]
    async fn create_contact(
        &self,
        params: Parameters<CreateContactParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        tracing::debug!(email = %params.email, "MCP Handler: create_contact called");

        let fields = ContactFields {
            first_name: params.first_name,
            last_name: params.last_name,
            email: params.email,
            phone_number: params.phone_number,
            job_title: params.job_title,
            company: params.company,
        };

        let contact = self
            .session
            .lock()
            .await
            .create(&fields)
            .await
            .map_err(to_mcp_error)?;

        json_result(&contact)
    }

    /// Update some fields of a contact.
    #[tool(
        description = "Update a contact. Only supplied fields change; an empty job title or company clears it."
    )]
    async fn update_contact(
        &self,
        params: Parameters<UpdateContactParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let id = parse_id(&params.contact_id)?;

        let patch = ContactPatch {
            first_name: params.first_name,
            last_name: params.last_name,
            email: params.email,
            phone_number: params.phone_number,
            job_title: params.job_title,
            company: params.company,
        };

        let contact = self
            .session
            .lock()
            .await
            .update(&id, &patch)
            .await
            .map_err(to_mcp_error)?;

        json_result(&contact)
    }

    /// Permanently delete a contact.
    #[tool(description = "Permanently delete a contact by ID")]
    async fn delete_contact(
        &self,
        params: Parameters<ContactIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let id = parse_id(&params.0.contact_id)?;

        self.session
            .lock()
            .await
            .delete(&id)
            .await
            .map_err(to_mcp_error)?;

        json_result(&serde_json::json!({ "deleted": id }))
    }

    /// Toggle selection of contacts in the current filtered view.
    #[tool(
        description = "Toggle selection of one or more contacts. Each ID must match the current filter."
    )]
    async fn select_contacts(
        &self,
        params: Parameters<SelectContactsParams>,
    ) -> Result<CallToolResult, McpError> {
        let ids = params
            .0
            .contact_ids
            .iter()
            .map(|raw| parse_id(raw))
            .collect::<Result<Vec<_>, _>>()?;

        let mut session = self.session.lock().await;
        for id in &ids {
            session.toggle(id).map_err(to_mcp_error)?;
        }

        json_result(&selection_json(&session))
    }

    /// Select every contact matching the filter, on every page.
    #[tool(description = "Select every contact matching the current filter, across all pages")]
    async fn select_all_contacts(&self) -> Result<CallToolResult, McpError> {
        let mut session = self.session.lock().await;
        session.select_all();
        json_result(&selection_json(&session))
    }

    #[tool(description = "Deselect all contacts")]
    async fn clear_selection(&self) -> Result<CallToolResult, McpError> {
        let mut session = self.session.lock().await;
        session.clear_selection();
        json_result(&selection_json(&session))
    }

    /// Delete every selected contact, reporting per-contact failures.
    #[tool(
        description = "Delete every selected contact. Deletions are independent; the result lists which succeeded and which failed with the reason."
    )]
    async fn bulk_delete_contacts(&self) -> Result<CallToolResult, McpError> {
        let outcome = self.session.lock().await.bulk_delete().await;

        let failed: serde_json::Map<String, serde_json::Value> = outcome
            .failed
            .iter()
            .map(|(id, e)| (id.to_string(), serde_json::Value::from(e.to_string())))
            .collect();

        json_result(&serde_json::json!({
            "succeeded": outcome.succeeded,
            "failed": failed,
        }))
    }

    /// Export the selected contacts to a file in the export directory.
    #[tool(
        description = "Export the selected contacts as json or csv into the export directory, in list order. Clears the selection once the file is written."
    )]
    async fn export_selected_contacts(
        &self,
        params: Parameters<ExportParams>,
    ) -> Result<CallToolResult, McpError> {
        let format: ExportFormat = params.0.format.parse().map_err(|e: DirectoryError| McpError {
            code: ErrorCode::INVALID_PARAMS,
            message: Cow::from(e.to_string()),
            data: None,
        })?;

        // Held until the file is saved so the cleared selection is the exported one
        let mut session = self.session.lock().await;
        let file = session.export(format).map_err(to_mcp_error)?;

        let dir = self.export_dir.clone();
        let path = dir.join(file.file_name);
        let written = path.clone();
        let bytes = file.bytes.len();

        tokio::task::spawn_blocking(move || {
            std::fs::create_dir_all(&dir)?;
            std::fs::write(&written, &file.bytes)
        })
        .await
        .map_err(internal_error)?
        .map_err(|e| internal_error(DirectoryError::Export(e.to_string())))?;

        session.clear_selection();
        tracing::info!(path = %path.display(), bytes, "Export written");

        json_result(&serde_json::json!({
            "path": path.display().to_string(),
            "content_type": file.content_type,
            "bytes": bytes,
        }))
    }
}

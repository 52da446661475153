//! MCP server for the contact directory.
//!
//! This module exposes a contact session to MCP clients over stdio.

pub mod handlers;

pub use handlers::ContactDirectoryServer;

use anyhow::Result;
use rmcp::transport::io::stdio;
use rmcp::ServiceExt;

/// Run the server with stdio transport until the client disconnects.
pub async fn run_server(server: ContactDirectoryServer) -> Result<()> {
    let service = server.serve(stdio()).await?;
    service.waiting().await?;

    Ok(())
}

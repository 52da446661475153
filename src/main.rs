//! Contact Directory - Main entry point
//!
//! Serves one contact session over MCP on stdio. The authoritative store is
//! either in-process or a remote REST backend, chosen by `CONTACTS_API_URL`.

use anyhow::Result;
use contact_directory::client::{AsyncContactsClient, AsyncContactsClientImpl};
use contact_directory::repositories::{
    ContactRepository, HttpContactRepository, StoreContactRepository,
};
use contact_directory::{Config, ContactDirectoryServer, ContactSession, ContactStore, ContactsClient};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load configuration before logging so LOG_LEVEL can seed the filter
    let config = Config::from_env();
    let default_level = config
        .as_ref()
        .map(|c| c.log_level.clone())
        .unwrap_or_else(|_| "error".to_string());

    // stderr only; stdout carries MCP
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match config {
        Ok(cfg) => {
            info!("Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let repo: Arc<dyn ContactRepository> = match &config.contacts_api_url {
        Some(url) => {
            info!("Using remote contact store at {}", url);
            let sync_client =
                ContactsClient::new(url.clone(), Duration::from_secs(config.request_timeout));
            let client =
                Arc::new(AsyncContactsClientImpl::new(sync_client)) as Arc<dyn AsyncContactsClient>;
            Arc::new(HttpContactRepository::new(client))
        }
        None => {
            info!("Using in-process contact store");
            Arc::new(StoreContactRepository::new(Arc::new(ContactStore::new())))
        }
    };

    let mut session = ContactSession::new(repo, config.default_page_size);
    match session.load().await {
        Ok(count) => info!("Loaded {} contacts", count),
        Err(e) => warn!("Initial contact load failed, starting empty: {}", e),
    }

    let server = ContactDirectoryServer::new(session, config.export_dir.clone());

    info!("Starting MCP server with stdio transport");
    contact_directory::server::run_server(server).await?;

    info!("Contact directory shutdown complete");
    Ok(())
}

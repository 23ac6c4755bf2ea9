use crate::clients::{DocumentClient, UserClient};
use crate::config::DashboardConfig;
use lifecycle_framework::sandbox::SandboxBackend;
use lifecycle_framework::{
    ConfigError, HttpVerb, ReqwestTransport, ResourceClient, Transport, TransportError,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::info;

const SANDBOX_BUFFER: usize = 32;
const SANDBOX_USERS_URL: &str = "http://sandbox.local/api/users";
const SANDBOX_DOCUMENTS_URL: &str = "http://sandbox.local/api/documents";

#[derive(Debug, Error)]
pub enum SystemError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("HTTP client setup failed: {0}")]
    Transport(#[from] TransportError),
    #[error("Sandbox task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Owns the domain clients and any background backends they talk to.
pub struct DashboardSystem {
    pub user_client: UserClient,
    pub document_client: DocumentClient,
    pub config: DashboardConfig,
    handles: Vec<JoinHandle<()>>,
}

impl DashboardSystem {
    /// Wires both clients over explicit transports.
    pub fn with_transports(
        config: DashboardConfig,
        users: Arc<dyn Transport>,
        documents: Arc<dyn Transport>,
    ) -> Self {
        let user_client = UserClient::new(ResourceClient::new(config.users.clone(), users));
        let document_client =
            DocumentClient::new(ResourceClient::new(config.documents.clone(), documents));
        Self {
            user_client,
            document_client,
            config,
            handles: Vec::new(),
        }
    }

    /// Talks to the real services over HTTP, sharing one connection pool.
    pub fn connect(config: DashboardConfig) -> Result<Self, SystemError> {
        let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::new(config.timeout())?);
        info!(
            users = %config.users.base_url,
            documents = %config.documents.base_url,
            "Connecting dashboard clients"
        );
        Ok(Self::with_transports(config, transport.clone(), transport))
    }

    /// Starts in-memory backends for both services. The documents backend
    /// rejects `PATCH`, so status changes go through the `PUT` fallback.
    pub fn sandbox() -> Result<Self, SystemError> {
        let config = DashboardConfig::new(SANDBOX_USERS_URL, SANDBOX_DOCUMENTS_URL)?;

        let (users_backend, users_transport) = SandboxBackend::new(&config.users, SANDBOX_BUFFER);
        let users_backend = users_backend
            .with_lookup("email", "email")
            .with_lookup("document", "documentNumber");

        let (documents_backend, documents_transport) =
            SandboxBackend::new(&config.documents, SANDBOX_BUFFER);
        let documents_backend = documents_backend
            .with_owner_field("userId")
            .reject_verb(HttpVerb::Patch);

        let handles = vec![
            tokio::spawn(users_backend.run()),
            tokio::spawn(documents_backend.run()),
        ];
        info!("Sandbox backends started");

        let mut system =
            Self::with_transports(config, Arc::new(users_transport), Arc::new(documents_transport));
        system.handles = handles;
        Ok(system)
    }

    /// Drops the clients, which closes the sandbox channels, then waits for
    /// the backends to stop.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down dashboard system");
        let Self {
            user_client,
            document_client,
            handles,
            ..
        } = self;
        drop(user_client);
        drop(document_client);

        for handle in handles {
            handle.await?;
        }
        Ok(())
    }
}

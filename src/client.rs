//! Portal client
//!
//! Bundles the auth and ingestion clients built from one [`PortalConfig`].

use crate::auth::AuthClient;
use crate::config::PortalConfig;
use crate::error::PortalError;
use crate::ingest::IngestionClient;

#[derive(Debug, Clone)]
pub struct PortalClient {
    config: PortalConfig,
    auth: AuthClient,
    ingestion: IngestionClient,
}

impl PortalClient {
    pub fn new(config: PortalConfig) -> Result<Self, PortalError> {
        let auth = AuthClient::new(&config)?;
        let ingestion = IngestionClient::new(&config)?;
        tracing::debug!(
            target: "rohde_portal::config",
            auth = %config.auth_base_url,
            ingestion = %config.ingestion_base_url,
            "portal client ready"
        );
        Ok(Self {
            config,
            auth,
            ingestion,
        })
    }

    /// Client with default service locations and HTTP settings.
    pub fn with_defaults() -> Result<Self, PortalError> {
        Self::new(PortalConfig::default())
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    pub fn auth(&self) -> &AuthClient {
        &self.auth
    }

    pub fn ingestion(&self) -> &IngestionClient {
        &self.ingestion
    }
}

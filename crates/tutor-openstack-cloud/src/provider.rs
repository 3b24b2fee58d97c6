//! Cloud API seams used by the commands

use crate::credentials::CloudCredentials;
use crate::error::Result;
use crate::magnum::MagnumClient;
use crate::params::ParamMap;
use crate::session::Session;
use async_trait::async_trait;

/// Container orchestration engine (Magnum) operations
///
/// The commands only talk to the cloud through this trait, so tests can
/// substitute a recording implementation.
#[async_trait]
pub trait CoeApi: Send + Sync {
    /// Credentials of the session behind this client
    fn credentials(&self) -> &CloudCredentials;

    /// Create a cluster; returns the API response body
    async fn create_coe_cluster(&self, params: &ParamMap) -> Result<serde_json::Value>;

    /// Create a cluster template; returns the API response body
    async fn create_coe_cluster_template(&self, params: &ParamMap) -> Result<serde_json::Value>;

    /// Delete a cluster by name or UUID
    ///
    /// Returns `false` when no such cluster exists.
    async fn delete_coe_cluster(&self, name_or_id: &str) -> Result<bool>;
}

/// Produces an authenticated [`CoeApi`] on demand
///
/// Connecting is deferred until a command has passed validation, confirmation
/// and dry-run checks.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn CoeApi>>;

    /// Authenticate and return the verified credentials without resolving
    /// the Magnum endpoint
    ///
    /// Used by callers that only need object storage access.
    async fn credentials(&self) -> Result<CloudCredentials>;
}

/// Connects with credentials from `clouds.yaml` or `OS_*` variables
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvConnector;

#[async_trait]
impl Connector for EnvConnector {
    async fn connect(&self) -> Result<Box<dyn CoeApi>> {
        let session = authenticate_from_env().await?;
        Ok(Box::new(MagnumClient::new(session)?))
    }

    async fn credentials(&self) -> Result<CloudCredentials> {
        let session = authenticate_from_env().await?;
        Ok(session.credentials().clone())
    }
}

async fn authenticate_from_env() -> Result<Session> {
    let credentials = CloudCredentials::from_env()?;
    Session::authenticate(credentials).await
}

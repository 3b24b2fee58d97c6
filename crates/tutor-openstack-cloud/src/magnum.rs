//! Magnum (container-infra) REST client

use crate::credentials::CloudCredentials;
use crate::error::{CloudError, Result};
use crate::params::ParamMap;
use crate::provider::CoeApi;
use crate::session::Session;
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::Deserialize;

/// Service catalog type of Magnum
pub const SERVICE_TYPE: &str = "container-infra";

const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";
const API_VERSION_HEADER: &str = "OpenStack-API-Version";
const API_VERSION: &str = "container-infra latest";

/// Magnum API client bound to an authenticated session
pub struct MagnumClient {
    session: Session,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

impl MagnumClient {
    /// Resolve the Magnum endpoint from the session's service catalog.
    pub fn new(session: Session) -> Result<Self> {
        let endpoint = session.endpoint_for(SERVICE_TYPE)?;
        Ok(Self::with_endpoint(session, endpoint))
    }

    pub fn with_endpoint(session: Session, endpoint: impl Into<String>) -> Self {
        Self {
            session,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        tracing::debug!("{} {}", method, url);
        self.session
            .client()
            .request(method, url)
            .header(AUTH_TOKEN_HEADER, self.session.token())
            .header(API_VERSION_HEADER, API_VERSION)
    }

    async fn post(&self, resource: &str, params: &ParamMap) -> Result<serde_json::Value> {
        let url = api_url(&self.endpoint, resource);
        let response = self.request(Method::POST, &url).json(params).send().await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl CoeApi for MagnumClient {
    fn credentials(&self) -> &CloudCredentials {
        self.session.credentials()
    }

    async fn create_coe_cluster(&self, params: &ParamMap) -> Result<serde_json::Value> {
        self.post("clusters", params).await
    }

    async fn create_coe_cluster_template(&self, params: &ParamMap) -> Result<serde_json::Value> {
        self.post("clustertemplates", params).await
    }

    async fn delete_coe_cluster(&self, name_or_id: &str) -> Result<bool> {
        let mut url = reqwest::Url::parse(&api_url(&self.endpoint, "clusters"))
            .map_err(|e| CloudError::InvalidConfig(format!("invalid Magnum endpoint: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| CloudError::InvalidConfig("Magnum endpoint cannot be a base URL".to_string()))?
            .push(name_or_id);

        let response = self.request(Method::DELETE, url.as_str()).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                tracing::debug!("Cluster {} not found", name_or_id);
                Ok(false)
            }
            status if status.is_success() => Ok(true),
            _ => Err(api_error(response).await),
        }
    }
}

/// URL of a `/v1` resource for an endpoint with or without the version suffix
pub fn api_url(endpoint: &str, resource: &str) -> String {
    let base = endpoint.trim_end_matches('/');
    if base.ends_with("/v1") {
        format!("{}/{}", base, resource)
    } else {
        format!("{}/v1/{}", base, resource)
    }
}

async fn api_error(response: reqwest::Response) -> CloudError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    CloudError::Api {
        status,
        message: error_message(&body),
    }
}

/// Extract the human-readable part of a Magnum error body
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.errors.into_iter().next())
        .and_then(|entry| entry.detail.or(entry.title))
        .unwrap_or_else(|| body.trim().to_string())
}

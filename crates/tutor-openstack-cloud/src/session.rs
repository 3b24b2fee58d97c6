//! Keystone v3 session
//!
//! Password authentication scoped to a project. The token and the service
//! catalog returned by Keystone are kept for the lifetime of the session.

use crate::credentials::CloudCredentials;
use crate::error::{CloudError, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;

const SUBJECT_TOKEN_HEADER: &str = "X-Subject-Token";

/// Authenticated session against an OpenStack cloud
pub struct Session {
    client: reqwest::Client,
    credentials: CloudCredentials,
    token: String,
    catalog: Vec<CatalogEntry>,
}

/// One service of the Keystone service catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "type")]
    pub service_type: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoint {
    pub interface: String,
    pub url: String,

    #[serde(default)]
    pub region: Option<String>,

    #[serde(default)]
    pub region_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: TokenBody,
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    #[serde(default)]
    catalog: Vec<CatalogEntry>,
}

impl Session {
    /// Authenticate with Keystone and fetch the service catalog.
    pub async fn authenticate(credentials: CloudCredentials) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("tutor-openstack/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let url = tokens_url(&credentials.auth_url);
        tracing::debug!("POST {} (user {})", url, credentials.username);

        let response = client
            .post(&url)
            .json(&password_auth_body(&credentials))
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(CloudError::AuthenticationFailed(format!(
                "Keystone rejected the credentials of user '{}' for project '{}'",
                credentials.username, credentials.project_name
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CloudError::AuthenticationFailed(format!(
                "{} from {}: {}",
                status, url, body
            )));
        }

        let token = response
            .headers()
            .get(SUBJECT_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                CloudError::AuthenticationFailed(format!(
                    "Keystone response carries no {} header",
                    SUBJECT_TOKEN_HEADER
                ))
            })?;

        let body: TokenResponse = response.json().await?;
        tracing::info!(
            "Authenticated as {} ({} catalog entries)",
            credentials.username,
            body.token.catalog.len()
        );

        Ok(Self {
            client,
            credentials,
            token,
            catalog: body.token.catalog,
        })
    }

    /// Assemble a session from already known parts.
    pub fn from_parts(
        client: reqwest::Client,
        credentials: CloudCredentials,
        token: impl Into<String>,
        catalog: Vec<CatalogEntry>,
    ) -> Self {
        Self {
            client,
            credentials,
            token: token.into(),
            catalog,
        }
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn credentials(&self) -> &CloudCredentials {
        &self.credentials
    }

    /// Endpoint URL of `service_type` for the configured interface and region
    pub fn endpoint_for(&self, service_type: &str) -> Result<String> {
        find_endpoint(
            &self.catalog,
            service_type,
            &self.credentials.interface,
            self.credentials.region.as_deref(),
        )
    }
}

/// Keystone token URL for an auth URL with or without the `/v3` suffix
pub fn tokens_url(auth_url: &str) -> String {
    let base = auth_url.trim_end_matches('/');
    if base.ends_with("/v3") {
        format!("{}/auth/tokens", base)
    } else {
        format!("{}/v3/auth/tokens", base)
    }
}

fn password_auth_body(credentials: &CloudCredentials) -> serde_json::Value {
    json!({
        "auth": {
            "identity": {
                "methods": ["password"],
                "password": {
                    "user": {
                        "name": credentials.username,
                        "domain": { "name": credentials.user_domain },
                        "password": credentials.password,
                    }
                }
            },
            "scope": {
                "project": {
                    "name": credentials.project_name,
                    "domain": { "name": credentials.project_domain },
                }
            }
        }
    })
}

/// Pick an endpoint out of a service catalog.
///
/// Without a region the first endpoint with the wanted interface wins.
pub fn find_endpoint(
    catalog: &[CatalogEntry],
    service_type: &str,
    interface: &str,
    region: Option<&str>,
) -> Result<String> {
    catalog
        .iter()
        .filter(|entry| entry.service_type == service_type)
        .flat_map(|entry| entry.endpoints.iter())
        .find(|endpoint| {
            endpoint.interface == interface
                && region.is_none_or(|r| {
                    endpoint.region.as_deref() == Some(r) || endpoint.region_id.as_deref() == Some(r)
                })
        })
        .map(|endpoint| endpoint.url.trim_end_matches('/').to_string())
        .ok_or_else(|| CloudError::EndpointNotFound {
            service_type: service_type.to_string(),
            interface: interface.to_string(),
            region: region.unwrap_or("*").to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeServer, Reply};

    fn credentials(auth_url: &str) -> CloudCredentials {
        CloudCredentials {
            auth_url: auth_url.to_string(),
            username: "alice".to_string(),
            user_domain: "Default".to_string(),
            password: "s3cret".to_string(),
            project_name: "edx".to_string(),
            project_domain: "Default".to_string(),
            region: Some("RegionOne".to_string()),
            interface: "public".to_string(),
        }
    }

    fn catalog() -> Vec<CatalogEntry> {
        serde_json::from_value(json!([
            {
                "type": "identity",
                "endpoints": [
                    {"interface": "public", "region": "RegionOne", "url": "https://keystone.example.com/v3"}
                ]
            },
            {
                "type": "container-infra",
                "name": "magnum",
                "endpoints": [
                    {"interface": "internal", "region": "RegionOne", "url": "http://magnum.internal:9511/v1"},
                    {"interface": "public", "region": "RegionTwo", "url": "https://magnum.two.example.com:9511/v1"},
                    {"interface": "public", "region": "RegionOne", "url": "https://magnum.example.com:9511/v1/"}
                ]
            }
        ]))
        .unwrap()
    }

    #[test]
    fn test_tokens_url() {
        assert_eq!(
            tokens_url("https://keystone.example.com:5000/v3"),
            "https://keystone.example.com:5000/v3/auth/tokens"
        );
        assert_eq!(
            tokens_url("https://keystone.example.com:5000/v3/"),
            "https://keystone.example.com:5000/v3/auth/tokens"
        );
        assert_eq!(
            tokens_url("https://keystone.example.com:5000"),
            "https://keystone.example.com:5000/v3/auth/tokens"
        );
    }

    #[test]
    fn test_find_endpoint_by_region() {
        let url = find_endpoint(&catalog(), "container-infra", "public", Some("RegionOne")).unwrap();
        assert_eq!(url, "https://magnum.example.com:9511/v1");

        let url = find_endpoint(&catalog(), "container-infra", "public", Some("RegionTwo")).unwrap();
        assert_eq!(url, "https://magnum.two.example.com:9511/v1");
    }

    #[test]
    fn test_find_endpoint_without_region() {
        let url = find_endpoint(&catalog(), "container-infra", "internal", None).unwrap();
        assert_eq!(url, "http://magnum.internal:9511/v1");
    }

    #[test]
    fn test_find_endpoint_missing() {
        let result = find_endpoint(&catalog(), "container-infra", "admin", Some("RegionOne"));
        assert!(matches!(result, Err(CloudError::EndpointNotFound { .. })));
    }

    #[test]
    fn test_password_auth_body() {
        let body = password_auth_body(&credentials("https://keystone.example.com"));
        assert_eq!(body["auth"]["identity"]["password"]["user"]["name"], "alice");
        assert_eq!(body["auth"]["scope"]["project"]["name"], "edx");
        assert_eq!(
            body["auth"]["scope"]["project"]["domain"]["name"],
            "Default"
        );
    }

    #[tokio::test]
    async fn test_authenticate() {
        let server = FakeServer::start(vec![
            Reply::new(201, json!({ "token": { "catalog": catalog() } }).to_string())
                .header("X-Subject-Token", "gAAAAAB-token"),
        ])
        .await;

        let session = Session::authenticate(credentials(&server.url("/v3")))
            .await
            .unwrap();

        assert_eq!(session.token(), "gAAAAAB-token");
        assert_eq!(
            session.endpoint_for("container-infra").unwrap(),
            "https://magnum.example.com:9511/v1"
        );

        let requests = server.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].path, "/v3/auth/tokens");
        assert!(requests[0].body.contains("\"password\""));
    }

    #[tokio::test]
    async fn test_authenticate_rejected() {
        let server = FakeServer::start(vec![Reply::new(401, "{}")]).await;

        let result = Session::authenticate(credentials(&server.url(""))).await;
        assert!(matches!(result, Err(CloudError::AuthenticationFailed(_))));
    }
}

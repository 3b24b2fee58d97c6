//! Cloud credential discovery
//!
//! Follows the conventions of the OpenStack command-line clients: a named
//! cloud from `clouds.yaml` when `OS_CLOUD` is set, otherwise the `OS_*`
//! environment variables.

use crate::error::{CloudError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const DEFAULT_DOMAIN: &str = "Default";
const DEFAULT_INTERFACE: &str = "public";

/// Credentials of the active cloud
///
/// Read-only once loaded. The registry flow embeds them into the registry
/// storage configuration.
#[derive(Clone, PartialEq)]
pub struct CloudCredentials {
    pub auth_url: String,
    pub username: String,
    pub user_domain: String,
    pub password: String,
    pub project_name: String,
    pub project_domain: String,
    pub region: Option<String>,
    pub interface: String,
}

impl std::fmt::Debug for CloudCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudCredentials")
            .field("auth_url", &self.auth_url)
            .field("username", &self.username)
            .field("user_domain", &self.user_domain)
            .field("password", &"********")
            .field("project_name", &self.project_name)
            .field("project_domain", &self.project_domain)
            .field("region", &self.region)
            .field("interface", &self.interface)
            .finish()
    }
}

impl CloudCredentials {
    /// Load credentials from `clouds.yaml` (when `OS_CLOUD` is set) or from
    /// the `OS_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let lookup = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

        if let Some(cloud) = lookup("OS_CLOUD") {
            let path = find_clouds_yaml().ok_or(CloudError::CloudsYamlNotFound)?;
            tracing::debug!("Using cloud '{}' from {}", cloud, path.display());
            return Self::from_clouds_yaml(&path, &cloud, lookup);
        }

        Self::from_vars(lookup)
    }

    /// Build credentials from `OS_*` variables resolved through `lookup`.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| lookup(name).ok_or_else(|| CloudError::MissingEnvVar(name.to_string()));

        let project_name = lookup("OS_PROJECT_NAME")
            .or_else(|| lookup("OS_TENANT_NAME"))
            .ok_or_else(|| CloudError::MissingEnvVar("OS_PROJECT_NAME".to_string()))?;

        Ok(Self {
            auth_url: required("OS_AUTH_URL")?,
            username: required("OS_USERNAME")?,
            password: required("OS_PASSWORD")?,
            user_domain: lookup("OS_USER_DOMAIN_NAME").unwrap_or_else(|| DEFAULT_DOMAIN.to_string()),
            project_name,
            project_domain: lookup("OS_PROJECT_DOMAIN_NAME")
                .unwrap_or_else(|| DEFAULT_DOMAIN.to_string()),
            region: lookup("OS_REGION_NAME"),
            interface: lookup("OS_INTERFACE").unwrap_or_else(|| DEFAULT_INTERFACE.to_string()),
        })
    }

    /// Build credentials from the `cloud` entry of a `clouds.yaml` file.
    ///
    /// The password falls back to `OS_PASSWORD` when the file omits it.
    pub fn from_clouds_yaml<F>(path: &Path, cloud: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let content = std::fs::read_to_string(path)?;
        let file: CloudsFile = serde_yaml::from_str(&content)?;

        let entry = file
            .clouds
            .get(cloud)
            .ok_or_else(|| CloudError::CloudNotFound(cloud.to_string()))?;
        let auth = &entry.auth;

        let field = |value: &Option<String>, name: &str| {
            value
                .clone()
                .filter(|v| !v.is_empty())
                .ok_or_else(|| CloudError::InvalidConfig(format!("cloud '{cloud}' has no auth.{name}")))
        };

        let password = match auth.password.clone().filter(|p| !p.is_empty()) {
            Some(password) => password,
            None => lookup("OS_PASSWORD").ok_or_else(|| {
                CloudError::InvalidConfig(format!(
                    "cloud '{cloud}' has no auth.password and OS_PASSWORD is not set"
                ))
            })?,
        };

        let project_name = auth
            .project_name
            .clone()
            .or_else(|| auth.tenant_name.clone());

        Ok(Self {
            auth_url: field(&auth.auth_url, "auth_url")?,
            username: field(&auth.username, "username")?,
            user_domain: auth
                .user_domain_name
                .clone()
                .unwrap_or_else(|| DEFAULT_DOMAIN.to_string()),
            password,
            project_name: field(&project_name, "project_name")?,
            project_domain: auth
                .project_domain_name
                .clone()
                .unwrap_or_else(|| DEFAULT_DOMAIN.to_string()),
            region: entry.region_name.clone(),
            interface: entry
                .interface
                .clone()
                .unwrap_or_else(|| DEFAULT_INTERFACE.to_string()),
        })
    }
}

#[derive(Debug, Deserialize)]
struct CloudsFile {
    #[serde(default)]
    clouds: HashMap<String, CloudEntry>,
}

#[derive(Debug, Deserialize)]
struct CloudEntry {
    #[serde(default)]
    auth: AuthSection,
    region_name: Option<String>,
    interface: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AuthSection {
    auth_url: Option<String>,
    username: Option<String>,
    password: Option<String>,
    project_name: Option<String>,
    tenant_name: Option<String>,
    user_domain_name: Option<String>,
    project_domain_name: Option<String>,
}

/// Locate `clouds.yaml` in the standard search path
pub fn find_clouds_yaml() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(path) = std::env::var("OS_CLIENT_CONFIG_FILE") {
        candidates.push(PathBuf::from(path));
    }
    if let Ok(current_dir) = std::env::current_dir() {
        candidates.push(current_dir.join("clouds.yaml"));
    }
    if let Some(config_dir) = dirs::config_dir() {
        candidates.push(config_dir.join("openstack").join("clouds.yaml"));
    }
    candidates.push(PathBuf::from("/etc/openstack/clouds.yaml"));

    candidates.into_iter().find(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_from_vars_full() {
        let credentials = CloudCredentials::from_vars(vars(&[
            ("OS_AUTH_URL", "https://keystone.example.com:5000/v3"),
            ("OS_USERNAME", "alice"),
            ("OS_PASSWORD", "s3cret"),
            ("OS_PROJECT_NAME", "edx"),
            ("OS_USER_DOMAIN_NAME", "users"),
            ("OS_PROJECT_DOMAIN_NAME", "projects"),
            ("OS_REGION_NAME", "RegionOne"),
        ]))
        .unwrap();

        assert_eq!(credentials.auth_url, "https://keystone.example.com:5000/v3");
        assert_eq!(credentials.username, "alice");
        assert_eq!(credentials.password, "s3cret");
        assert_eq!(credentials.project_name, "edx");
        assert_eq!(credentials.user_domain, "users");
        assert_eq!(credentials.project_domain, "projects");
        assert_eq!(credentials.region.as_deref(), Some("RegionOne"));
        assert_eq!(credentials.interface, "public");
    }

    #[test]
    fn test_from_vars_defaults_domains() {
        let credentials = CloudCredentials::from_vars(vars(&[
            ("OS_AUTH_URL", "https://keystone.example.com:5000"),
            ("OS_USERNAME", "alice"),
            ("OS_PASSWORD", "s3cret"),
            ("OS_TENANT_NAME", "legacy"),
        ]))
        .unwrap();

        assert_eq!(credentials.user_domain, "Default");
        assert_eq!(credentials.project_domain, "Default");
        assert_eq!(credentials.project_name, "legacy");
        assert!(credentials.region.is_none());
    }

    #[test]
    fn test_from_vars_missing_password() {
        let result = CloudCredentials::from_vars(vars(&[
            ("OS_AUTH_URL", "https://keystone.example.com:5000"),
            ("OS_USERNAME", "alice"),
            ("OS_PROJECT_NAME", "edx"),
        ]));

        match result {
            Err(CloudError::MissingEnvVar(name)) => assert_eq!(name, "OS_PASSWORD"),
            other => panic!("Expected MissingEnvVar, got {:?}", other),
        }
    }

    #[test]
    fn test_debug_redacts_password() {
        let credentials = CloudCredentials::from_vars(vars(&[
            ("OS_AUTH_URL", "https://keystone.example.com:5000"),
            ("OS_USERNAME", "alice"),
            ("OS_PASSWORD", "s3cret"),
            ("OS_PROJECT_NAME", "edx"),
        ]))
        .unwrap();

        let debug = format!("{:?}", credentials);
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("alice"));
    }

    const CLOUDS_YAML: &str = r#"
clouds:
  mycloud:
    auth:
      auth_url: https://keystone.example.com:5000/v3
      username: bob
      project_name: edx-prod
      user_domain_name: Default
      project_domain_name: Default
    region_name: Fra1
    interface: internal
"#;

    #[test]
    fn test_from_clouds_yaml_with_password_fallback() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("clouds.yaml");
        std::fs::write(&path, CLOUDS_YAML).unwrap();

        let credentials =
            CloudCredentials::from_clouds_yaml(&path, "mycloud", vars(&[("OS_PASSWORD", "pw")]))
                .unwrap();

        assert_eq!(credentials.username, "bob");
        assert_eq!(credentials.password, "pw");
        assert_eq!(credentials.project_name, "edx-prod");
        assert_eq!(credentials.region.as_deref(), Some("Fra1"));
        assert_eq!(credentials.interface, "internal");
    }

    #[test]
    fn test_from_clouds_yaml_unknown_cloud() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("clouds.yaml");
        std::fs::write(&path, CLOUDS_YAML).unwrap();

        let result = CloudCredentials::from_clouds_yaml(&path, "other", vars(&[]));
        assert!(matches!(result, Err(CloudError::CloudNotFound(name)) if name == "other"));
    }

    #[test]
    #[serial]
    fn test_from_env_uses_clouds_yaml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("clouds.yaml");
        std::fs::write(&path, CLOUDS_YAML).unwrap();

        temp_env::with_vars(
            [
                ("OS_CLOUD", Some("mycloud")),
                ("OS_CLIENT_CONFIG_FILE", path.to_str()),
                ("OS_PASSWORD", Some("from-env")),
            ],
            || {
                let credentials = CloudCredentials::from_env().unwrap();
                assert_eq!(credentials.username, "bob");
                assert_eq!(credentials.password, "from-env");
            },
        );
    }
}

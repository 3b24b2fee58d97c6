//! Cloud client error types

use thiserror::Error;

/// OpenStack client errors
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error(
        "clouds.yaml not found. Searched OS_CLIENT_CONFIG_FILE, ./clouds.yaml, ~/.config/openstack/clouds.yaml and /etc/openstack/clouds.yaml"
    )]
    CloudsYamlNotFound,

    #[error("Cloud '{0}' is not defined in clouds.yaml")]
    CloudNotFound(String),

    #[error("Invalid cloud configuration: {0}")]
    InvalidConfig(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error(
        "No {interface} endpoint for service '{service_type}' in region '{region}' of the service catalog"
    )]
    EndpointNotFound {
        service_type: String,
        interface: String,
        region: String,
    },

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CloudError>;

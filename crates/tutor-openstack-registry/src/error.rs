use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error(
        "Cannot connect to Docker: {0}\n\nHint:\n  • Check that the Docker daemon is running\n  • Check that `docker ps` works for the current user"
    )]
    DockerConnectionFailed(String),

    #[error(
        "Container '{container}' already exists\n\nHint:\n  • Remove it first: docker rm -f {container}"
    )]
    ContainerExists { container: String },

    #[error("Failed to pull image '{image}': {message}")]
    ImagePullFailed { image: String, message: String },

    #[error("Docker API error: {0}")]
    DockerApiError(String),

    #[error("Registry at {url} answered with HTTP {status}")]
    HealthCheckFailed { url: String, status: u16 },

    #[error(
        "Registry at {url} did not become ready after {attempts} attempts ({elapsed:?}): {last_error}\n\nHint:\n  • Check the registry logs: docker logs tutor-openstack-registry"
    )]
    HealthCheckExhausted {
        url: String,
        attempts: u32,
        elapsed: Duration,
        last_error: String,
    },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<bollard::errors::Error> for RegistryError {
    fn from(err: bollard::errors::Error) -> Self {
        let err_str = err.to_string();
        // 接続エラーの可能性をチェック
        if err_str.contains("Connection refused") || err_str.contains("No such file or directory")
        {
            RegistryError::DockerConnectionFailed(err_str)
        } else {
            RegistryError::DockerApiError(err_str)
        }
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;

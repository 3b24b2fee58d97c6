//! コンテナ起動ランタイム

// Bollard 0.19 の非推奨APIを一時的に使用
#![allow(deprecated)]

use crate::converter::ContainerSpec;
use crate::error::{RegistryError, Result};
use bollard::Docker;
use futures_util::stream::StreamExt;

/// コンテナを起動する抽象
///
/// bootstrap フローはこのトレイト越しにのみ Docker を操作する。
#[allow(async_fn_in_trait)]
pub trait ContainerLauncher {
    /// コンテナを作成して起動し、コンテナIDを返す
    async fn launch(&self, spec: &ContainerSpec) -> Result<String>;
}

/// bollard によるローカル Docker デーモン向け実装
pub struct DockerLauncher {
    docker: Docker,
}

impl DockerLauncher {
    /// ローカルのデーモンに接続し、ping で疎通を確認する
    pub async fn connect() -> Result<Self> {
        let docker = Docker::connect_with_local_defaults()
            .map_err(|e| RegistryError::DockerConnectionFailed(e.to_string()))?;
        docker
            .ping()
            .await
            .map_err(|e| RegistryError::DockerConnectionFailed(e.to_string()))?;
        Ok(Self { docker })
    }

    pub fn new(docker: Docker) -> Self {
        Self { docker }
    }

    async fn pull_image(&self, image: &str) -> Result<()> {
        let (image_name, tag) = parse_image_tag(image);
        tracing::info!("Pulling image {}", image);

        let options = bollard::image::CreateImageOptions {
            from_image: image_name,
            tag,
            ..Default::default()
        };

        let mut stream = self.docker.create_image(Some(options), None, None);

        while let Some(info) = stream.next().await {
            match info {
                Ok(bollard::models::CreateImageInfo {
                    status: Some(status),
                    ..
                }) => tracing::debug!("{}: {}", image, status),
                Ok(_) => {}
                Err(e) => {
                    return Err(RegistryError::ImagePullFailed {
                        image: image.to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    async fn start(&self, id: &str) -> Result<()> {
        self.docker
            .start_container(id, None::<bollard::query_parameters::StartContainerOptions>)
            .await?;
        Ok(())
    }
}

impl ContainerLauncher for DockerLauncher {
    async fn launch(&self, spec: &ContainerSpec) -> Result<String> {
        let (config, options) = spec.to_container_config();
        tracing::debug!("Creating container {} from {}", spec.name, spec.image);

        let response = match self
            .docker
            .create_container(Some(options.clone()), config.clone())
            .await
        {
            Ok(response) => response,
            Err(bollard::errors::Error::DockerResponseServerError {
                status_code: 409, ..
            }) => {
                return Err(RegistryError::ContainerExists {
                    container: spec.name.clone(),
                });
            }
            Err(bollard::errors::Error::DockerResponseServerError {
                status_code: 404, ..
            }) => {
                // イメージがローカルにない
                self.pull_image(&spec.image).await?;
                self.docker
                    .create_container(Some(options), config)
                    .await?
            }
            Err(e) => return Err(e.into()),
        };

        self.start(&response.id).await?;
        tracing::info!("Started container {} ({})", spec.name, response.id);
        Ok(response.id)
    }
}

/// `name:tag` を分割（タグなしは latest）
pub fn parse_image_tag(image: &str) -> (&str, &str) {
    match image.rsplit_once(':') {
        Some((name, tag)) if !tag.contains('/') => (name, tag),
        _ => (image, "latest"),
    }
}

//! コンテナ定義から Docker API パラメータへの変換

use bollard::container::{Config, CreateContainerOptions};
use bollard::models::{HostConfig, PortBinding};
use std::collections::HashMap;
use std::path::Path;

pub const REGISTRY_IMAGE: &str = "registry:2";
pub const REGISTRY_CONTAINER: &str = "tutor-openstack-registry";
pub const REGISTRY_CONFIG_MOUNT: &str = "/etc/docker/registry/config.yml";
pub const REGISTRY_PORT: u16 = 5000;

pub const UI_IMAGE: &str = "joxit/docker-registry-ui:2";
pub const UI_CONTAINER: &str = "tutor-openstack-registry-ui";
pub const UI_HOST_PORT: u16 = 8080;

/// ホスト側から見たレジストリURL
pub const REGISTRY_URL: &str = "http://localhost:5000";

const ROLE_LABEL: &str = "tutor-openstack.role";

/// 公開ポート（TCP）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortMapping {
    pub host: u16,
    pub container: u16,
}

/// 起動するコンテナの定義
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSpec {
    pub name: String,
    pub image: String,
    pub role: String,
    pub ports: Vec<PortMapping>,
    pub env: Vec<(String, String)>,
    /// `host:container:mode` 形式
    pub binds: Vec<String>,
}

/// Swift バックエンドのレジストリ本体
pub fn registry_spec(config_path: &Path) -> ContainerSpec {
    ContainerSpec {
        name: REGISTRY_CONTAINER.to_string(),
        image: REGISTRY_IMAGE.to_string(),
        role: "registry".to_string(),
        ports: vec![PortMapping {
            host: REGISTRY_PORT,
            container: REGISTRY_PORT,
        }],
        env: Vec::new(),
        binds: vec![format!(
            "{}:{}:ro",
            config_path.display(),
            REGISTRY_CONFIG_MOUNT
        )],
    }
}

/// レジストリ閲覧用 Web UI
pub fn registry_ui_spec() -> ContainerSpec {
    let env = [
        ("REGISTRY_TITLE", "Tutor registry"),
        ("REGISTRY_URL", REGISTRY_URL),
        ("SINGLE_REGISTRY", "true"),
        ("DELETE_IMAGES", "true"),
    ];

    ContainerSpec {
        name: UI_CONTAINER.to_string(),
        image: UI_IMAGE.to_string(),
        role: "registry-ui".to_string(),
        ports: vec![PortMapping {
            host: UI_HOST_PORT,
            container: 80,
        }],
        env: env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        binds: Vec::new(),
    }
}

impl ContainerSpec {
    /// Docker のコンテナ作成パラメータに変換
    #[allow(deprecated)]
    pub fn to_container_config(&self) -> (Config<String>, CreateContainerOptions<String>) {
        let mut port_bindings = HashMap::new();
        let mut exposed_ports = HashMap::new();

        for port in &self.ports {
            let container_port = format!("{}/tcp", port.container);
            exposed_ports.insert(container_port.clone(), HashMap::new());
            port_bindings.insert(
                container_port,
                Some(vec![PortBinding {
                    host_ip: Some("0.0.0.0".to_string()),
                    host_port: Some(port.host.to_string()),
                }]),
            );
        }

        let env: Vec<String> = self
            .env
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();

        let host_config = HostConfig {
            port_bindings: Some(port_bindings),
            binds: (!self.binds.is_empty()).then(|| self.binds.clone()),
            ..Default::default()
        };

        let labels = HashMap::from([(ROLE_LABEL.to_string(), self.role.clone())]);

        let config = Config {
            image: Some(self.image.clone()),
            env: (!env.is_empty()).then_some(env),
            exposed_ports: Some(exposed_ports),
            host_config: Some(host_config),
            labels: Some(labels),
            ..Default::default()
        };

        let options = CreateContainerOptions {
            name: self.name.clone(),
            platform: None,
        };

        (config, options)
    }
}

//! Tutor の `config.yml` に含まれる `OPENSTACK_*` キーの型付きビュー

use serde::{Deserialize, Deserializer, Serialize};

/// ホスト設定内でこのプラグインが所有するキーのプレフィックス
pub const KEY_PREFIX: &str = "OPENSTACK_";

const DEFAULT_CLUSTER_NAME: &str = "tutor";
const DEFAULT_TEMPLATE: &str = "tutor-kubernetes";
const DEFAULT_MASTER_COUNT: u32 = 1;
const DEFAULT_NODE_COUNT: u32 = 1;
const DEFAULT_DOCKER_VOLUME_SIZE: u32 = 50;

/// プラグイン設定
///
/// すべてのフィールドに明示的なデフォルト値がある。
/// 他プラグインのキーは無視される。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenStackSettings {
    #[serde(rename = "OPENSTACK_CLUSTER_NAME", deserialize_with = "cluster_name_or_default")]
    pub cluster_name: String,

    #[serde(rename = "OPENSTACK_TEMPLATE", deserialize_with = "template_or_default")]
    pub template: String,

    /// クラスターテンプレートに埋め込むキーペア
    #[serde(rename = "OPENSTACK_TEMPLATE_KEYPAIR")]
    pub template_keypair: Option<String>,

    /// クラスター作成時に渡すキーペア
    #[serde(rename = "OPENSTACK_KEYPAIR")]
    pub keypair: Option<String>,

    #[serde(rename = "OPENSTACK_MASTER_COUNT", deserialize_with = "master_count_or_default")]
    pub master_count: u32,

    #[serde(rename = "OPENSTACK_NODE_COUNT", deserialize_with = "node_count_or_default")]
    pub node_count: u32,

    #[serde(rename = "OPENSTACK_KUBERNETES_VERSION")]
    pub kubernetes_version: Option<String>,

    /// Dockerボリュームサイズ（GB）
    #[serde(rename = "OPENSTACK_DOCKER_VOLUME_SIZE", deserialize_with = "docker_volume_size_or_default")]
    pub docker_volume_size: u32,

    /// ブートボリュームサイズ（GB）
    #[serde(rename = "OPENSTACK_BOOT_VOLUME_SIZE")]
    pub boot_volume_size: Option<u32>,

    #[serde(rename = "OPENSTACK_FIXED_NETWORK")]
    pub fixed_network: Option<String>,

    #[serde(rename = "OPENSTACK_FIXED_SUBNET")]
    pub fixed_subnet: Option<String>,

    #[serde(rename = "OPENSTACK_NETWORK_DRIVER")]
    pub network_driver: Option<String>,

    #[serde(rename = "OPENSTACK_HYPERKUBE_PREFIX")]
    pub hyperkube_prefix: Option<String>,

    #[serde(rename = "OPENSTACK_ENABLE_REGISTRY", deserialize_with = "null_as_false")]
    pub enable_registry: bool,

    #[serde(rename = "OPENSTACK_EXTERNAL_NETWORK")]
    pub external_network: Option<String>,

    #[serde(rename = "OPENSTACK_MASTER_FLAVOR")]
    pub master_flavor: Option<String>,

    #[serde(rename = "OPENSTACK_NODE_FLAVOR")]
    pub node_flavor: Option<String>,

    #[serde(rename = "OPENSTACK_IMAGE")]
    pub image: Option<String>,
}

impl Default for OpenStackSettings {
    fn default() -> Self {
        Self {
            cluster_name: DEFAULT_CLUSTER_NAME.to_string(),
            template: DEFAULT_TEMPLATE.to_string(),
            template_keypair: None,
            keypair: None,
            master_count: DEFAULT_MASTER_COUNT,
            node_count: DEFAULT_NODE_COUNT,
            kubernetes_version: None,
            docker_volume_size: DEFAULT_DOCKER_VOLUME_SIZE,
            boot_volume_size: None,
            fixed_network: None,
            fixed_subnet: None,
            network_driver: None,
            hyperkube_prefix: None,
            enable_registry: false,
            external_network: None,
            master_flavor: None,
            node_flavor: None,
            image: None,
        }
    }
}

// `tutor config save` はキーを `null` のまま書き出すことがある。
// キーが存在しない場合と同じくデフォルト値として扱う。
fn null_or<'de, D, T>(deserializer: D, fallback: T) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or(fallback))
}

fn cluster_name_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    null_or(deserializer, DEFAULT_CLUSTER_NAME.to_string())
}

fn template_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    null_or(deserializer, DEFAULT_TEMPLATE.to_string())
}

fn master_count_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    null_or(deserializer, DEFAULT_MASTER_COUNT)
}

fn node_count_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    null_or(deserializer, DEFAULT_NODE_COUNT)
}

fn docker_volume_size_or_default<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<u32, D::Error> {
    null_or(deserializer, DEFAULT_DOCKER_VOLUME_SIZE)
}

fn null_as_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    null_or(deserializer, false)
}

fn is_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

impl OpenStackSettings {
    /// `create-template` に必須だが未設定（または空）のキー一覧
    pub fn missing_template_fields(&self) -> Vec<&'static str> {
        [
            ("OPENSTACK_EXTERNAL_NETWORK", &self.external_network),
            ("OPENSTACK_MASTER_FLAVOR", &self.master_flavor),
            ("OPENSTACK_NODE_FLAVOR", &self.node_flavor),
            ("OPENSTACK_IMAGE", &self.image),
        ]
        .into_iter()
        .filter(|(_, value)| !is_set(value))
        .map(|(key, _)| key)
        .collect()
    }

    /// ホストツールに登録する `(キー, デフォルト値)` の一覧
    pub fn defaults_table() -> Vec<(String, serde_json::Value)> {
        match serde_json::to_value(Self::default()) {
            Ok(serde_json::Value::Object(map)) => map.into_iter().collect(),
            _ => Vec::new(),
        }
    }
}

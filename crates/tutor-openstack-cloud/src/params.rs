//! Request parameters for Magnum calls
//!
//! Magnum treats the presence of a key as meaningful regardless of its value,
//! so optional settings that are unset, empty or false are left out of the
//! request entirely instead of being sent as `null`/`false`.

use serde::Serialize;
use serde_json::{Map, Value};
use tutor_openstack_config::OpenStackSettings;

/// Cluster creation timeout in minutes
pub const CREATE_TIMEOUT: u32 = 60;

/// Registry address Magnum nodes pull from when the registry is enabled
pub const NODE_REGISTRY: &str = "localhost:5000";

/// Whether a configuration value counts as set
pub trait Present {
    fn is_present(&self) -> bool;
}

impl Present for str {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl Present for String {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl Present for bool {
    fn is_present(&self) -> bool {
        *self
    }
}

impl Present for u32 {
    fn is_present(&self) -> bool {
        *self != 0
    }
}

impl Present for ParamMap {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl<T: Present> Present for Option<T> {
    fn is_present(&self) -> bool {
        self.as_ref().is_some_and(Present::is_present)
    }
}

/// Ordered keyword-argument map sent as a JSON request body
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParamMap(Map<String, Value>);

impl ParamMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unconditionally
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Insert only when `value` is present
    pub fn insert_present<T>(&mut self, key: &str, value: T) -> &mut Self
    where
        T: Present + Into<Value>,
    {
        if value.is_present() {
            self.0.insert(key.to_string(), value.into());
        }
        self
    }

    /// Insert only when `condition` holds
    pub fn insert_if(&mut self, condition: bool, key: &str, value: impl Into<Value>) -> &mut Self {
        if condition {
            self.0.insert(key.to_string(), value.into());
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Pretty-printed JSON for terminal output
    pub fn to_pretty_string(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| format!("{:?}", self.0))
    }
}

impl From<ParamMap> for Value {
    fn from(params: ParamMap) -> Self {
        Value::Object(params.0)
    }
}

/// Parameters of the `create cluster` call
pub fn create_coe_cluster_params(settings: &OpenStackSettings) -> ParamMap {
    let mut params = ParamMap::new();
    params
        .insert("name", settings.cluster_name.as_str())
        .insert("cluster_template_id", settings.template.as_str())
        .insert("master_count", settings.master_count)
        .insert("node_count", settings.node_count)
        .insert("create_timeout", CREATE_TIMEOUT)
        .insert_present("keypair", settings.keypair.clone());
    params
}

/// Labels of the cluster template
///
/// Magnum label values are strings.
pub fn cluster_template_labels(settings: &OpenStackSettings) -> ParamMap {
    let kube_tag = settings
        .kubernetes_version
        .as_deref()
        .filter(|v| v.is_present())
        .map(|v| format!("v{}", v));
    let boot_volume_size = settings
        .boot_volume_size
        .filter(|size| size.is_present())
        .map(|size| size.to_string());

    let mut labels = ParamMap::new();
    labels
        .insert("container_runtime", "containerd")
        .insert("cinder_csi_enabled", "true")
        .insert("cloud_provider_enabled", "true")
        .insert("auto_healing_enabled", "false")
        .insert_present("kube_tag", kube_tag)
        .insert_present("hyperkube_prefix", settings.hyperkube_prefix.clone())
        .insert_present("boot_volume_size", boot_volume_size);
    labels
}

/// Parameters of the `create cluster template` call
///
/// Assumes the required fields were validated; unset ones are sent empty.
pub fn create_coe_cluster_template_params(settings: &OpenStackSettings) -> ParamMap {
    let required = |value: &Option<String>| value.clone().unwrap_or_default();

    let mut params = ParamMap::new();
    params
        .insert("name", settings.template.as_str())
        .insert("coe", "kubernetes")
        .insert("docker_storage_driver", "overlay2")
        .insert("docker_volume_size", settings.docker_volume_size)
        .insert("external_network_id", required(&settings.external_network))
        .insert("flavor_id", required(&settings.node_flavor))
        .insert("floating_ip_enabled", true)
        .insert("image_id", required(&settings.image))
        .insert("labels", cluster_template_labels(settings))
        .insert("master_flavor_id", required(&settings.master_flavor))
        .insert("master_lb_enabled", true)
        .insert("volume_driver", "cinder")
        .insert_present("network_driver", settings.network_driver.clone())
        .insert_present("fixed_network", settings.fixed_network.clone())
        .insert_present("fixed_subnet", settings.fixed_subnet.clone())
        .insert_present("registry_enabled", settings.enable_registry)
        .insert_if(settings.enable_registry, "insecure_registry", NODE_REGISTRY)
        .insert_present("keypair_id", settings.template_keypair.clone());
    params
}

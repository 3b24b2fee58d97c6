//! tutor-openstack ローカルレジストリ
//!
//! OpenStack Swift をストレージとする Docker Distribution レジストリを
//! ローカルの Docker デーモン上に起動し、応答するまで待機する。

pub mod bootstrap;
pub mod config;
pub mod converter;
pub mod credfile;
pub mod error;
pub mod runtime;
pub mod waiter;

#[cfg(test)]
pub(crate) mod testing;

pub use bootstrap::{BootstrapOptions, BootstrapReport, BootstrapState, bootstrap};
pub use config::RegistryConfig;
pub use converter::{ContainerSpec, PortMapping, REGISTRY_URL, registry_spec, registry_ui_spec};
pub use credfile::write_credentials_file;
pub use error::{RegistryError, Result};
pub use runtime::{ContainerLauncher, DockerLauncher};
pub use waiter::{BackoffConfig, HealthCheck};

//! tutor-openstack cloud client
//!
//! This crate talks to the OpenStack APIs needed to run Tutor on a Magnum
//! managed Kubernetes cluster.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │           tutor-openstack CLI commands           │
//! └─────────────────┬───────────────────────────────┘
//!                   │ trait Connector / trait CoeApi
//! ┌─────────────────▼───────────────────────────────┐
//! │              tutor-openstack-cloud               │
//! │  ┌──────────────┐  ┌──────────────┐             │
//! │  │  params      │  │ credentials  │             │
//! │  │ (ParamMap)   │  │ clouds.yaml  │             │
//! │  └──────────────┘  │   / OS_*     │             │
//! │                    └──────┬───────┘             │
//! │  ┌──────────────┐  ┌──────▼───────┐             │
//! │  │ MagnumClient │◀─│   Session    │             │
//! │  └──────────────┘  │ (Keystone v3)│             │
//! │                    └──────────────┘             │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod credentials;
pub mod error;
pub mod magnum;
pub mod params;
pub mod provider;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports
pub use credentials::CloudCredentials;
pub use error::{CloudError, Result};
pub use magnum::MagnumClient;
pub use params::{
    ParamMap, Present, cluster_template_labels, create_coe_cluster_params,
    create_coe_cluster_template_params,
};
pub use provider::{CoeApi, Connector, EnvConnector};
pub use session::{CatalogEntry, Endpoint, Session};

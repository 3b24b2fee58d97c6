//! `tutor-openstack openstack` command handlers
//!
//! Handlers receive a [`Connector`](tutor_openstack_cloud::Connector) and only
//! connect after validation, confirmation and dry-run checks have passed.

pub mod cluster;
pub mod registry;
pub mod template;

/// Pretty-print an API response for the terminal
pub(crate) fn pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

//! Plugin descriptor handed to the host tool's registration API

use crate::cli::Cli;
use anyhow::Context;
use clap::CommandFactory;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tutor_openstack_config::OpenStackSettings;

pub const PLUGIN_NAME: &str = "openstack";

/// Rendered template folders and their destination under the host env
pub const TEMPLATE_TARGETS: [(&str, &str); 2] =
    [("openstack/build", "plugins"), ("openstack/apps", "plugins")];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PluginDescriptor {
    pub name: String,
    pub version: String,
    /// Subcommands of the `openstack` group
    pub commands: Vec<String>,
    pub config_defaults: Vec<(String, serde_json::Value)>,
    pub template_roots: Vec<PathBuf>,
    pub template_targets: Vec<(String, String)>,
    /// `(file name, contents)`, sorted by file name
    pub patches: Vec<(String, String)>,
}

/// Assets bundled with this crate
pub fn default_assets_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Build the descriptor from the `templates/` and `patches/` folders under `assets_dir`.
pub fn init(assets_dir: &Path) -> anyhow::Result<PluginDescriptor> {
    Ok(PluginDescriptor {
        name: PLUGIN_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        commands: command_names(),
        config_defaults: OpenStackSettings::defaults_table(),
        template_roots: vec![assets_dir.join("templates")],
        template_targets: TEMPLATE_TARGETS
            .iter()
            .map(|(src, dst)| (src.to_string(), dst.to_string()))
            .collect(),
        patches: load_patches(&assets_dir.join("patches"))?,
    })
}

fn command_names() -> Vec<String> {
    Cli::command()
        .find_subcommand(PLUGIN_NAME)
        .map(|group| {
            group
                .get_subcommands()
                .map(|cmd| cmd.get_name().to_string())
                .collect()
        })
        .unwrap_or_default()
}

fn load_patches(dir: &Path) -> anyhow::Result<Vec<(String, String)>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read patches directory {}", dir.display()))?;

    let mut patches = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read patch {}", path.display()))?;
        patches.push((name.to_string(), contents));
    }
    patches.sort_by(|a, b| a.0.cmp(&b.0));

    tracing::debug!("Loaded {} patch(es) from {}", patches.len(), dir.display());
    Ok(patches)
}

//! `openstack create-cluster` / `openstack delete-cluster`

use super::pretty;
use crate::error::CommandError;
use crate::prompt;
use colored::Colorize;
use std::io::BufRead;
use tutor_openstack_cloud::{Connector, create_coe_cluster_params};
use tutor_openstack_config::OpenStackSettings;

pub async fn handle_create(
    settings: &OpenStackSettings,
    connector: &dyn Connector,
    dry_run: bool,
) -> anyhow::Result<()> {
    let params = create_coe_cluster_params(settings);
    println!("{}", "Launching cluster with options:".cyan());
    println!("{}", params.to_pretty_string());

    if dry_run {
        println!("{}", "Dry run, not invoking API call".yellow());
        return Ok(());
    }

    let api = connector.connect().await?;
    let cluster = api.create_coe_cluster(&params).await?;

    println!("{}", "Cluster launch returned:".green());
    println!("{}", pretty(&cluster));
    Ok(())
}

/// Delete the configured cluster, asking for confirmation on `input` unless `yes`
pub async fn handle_delete<R: BufRead>(
    settings: &OpenStackSettings,
    connector: &dyn Connector,
    yes: bool,
    dry_run: bool,
    input: &mut R,
) -> anyhow::Result<()> {
    let name = &settings.cluster_name;
    println!("Deleting cluster: {}", name.cyan());

    if !yes {
        let question = format!("Delete cluster {}?", name);
        if !prompt::confirm(input, &mut std::io::stdout(), &question)? {
            return Err(CommandError::Aborted.into());
        }
    }

    if dry_run {
        println!("{}", "Dry run, not invoking API call".yellow());
        return Ok(());
    }

    let api = connector.connect().await?;
    if api.delete_coe_cluster(name).await? {
        println!("{} Cluster {} deletion requested", "✓".green(), name.cyan());
    } else {
        println!("{} Cluster {} not found", "ℹ".yellow(), name.cyan());
    }
    Ok(())
}

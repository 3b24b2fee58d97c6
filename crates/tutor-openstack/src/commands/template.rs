//! `openstack create-template`

use super::pretty;
use crate::error::CommandError;
use colored::Colorize;
use tutor_openstack_cloud::{Connector, create_coe_cluster_template_params};
use tutor_openstack_config::OpenStackSettings;

pub async fn handle_create(
    settings: &OpenStackSettings,
    connector: &dyn Connector,
    dry_run: bool,
) -> anyhow::Result<()> {
    let missing = settings.missing_template_fields();
    if !missing.is_empty() {
        return Err(CommandError::Usage(format!(
            "Missing required configuration: {}\n\nHint:\n  • Set them with `tutor config save --set {}=...`",
            missing.join(", "),
            missing[0]
        ))
        .into());
    }

    let params = create_coe_cluster_template_params(settings);
    println!("{}", "Creating cluster template with options:".cyan());
    println!("{}", params.to_pretty_string());

    if dry_run {
        println!("{}", "Dry run, not invoking API call".yellow());
        return Ok(());
    }

    let api = connector.connect().await?;
    let template = api.create_coe_cluster_template(&params).await?;

    println!("{}", "Cluster template creation returned:".green());
    println!("{}", pretty(&template));
    Ok(())
}

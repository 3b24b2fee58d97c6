//! `openstack registry`

use colored::Colorize;
use tutor_openstack_cloud::Connector;
use tutor_openstack_registry::converter::UI_HOST_PORT;
use tutor_openstack_registry::{
    BootstrapOptions, BootstrapState, ContainerLauncher, HealthCheck, REGISTRY_URL, bootstrap,
};

pub async fn handle<L: ContainerLauncher>(
    connector: &dyn Connector,
    launcher: &L,
    health: &HealthCheck,
    with_ui: bool,
) -> anyhow::Result<()> {
    // Swift only; the catalog may have no Magnum endpoint
    let credentials = connector.credentials().await?;

    println!("{}", "Starting Swift-backed registry...".cyan());
    let report = bootstrap(
        &credentials,
        launcher,
        health,
        BootstrapOptions { with_ui },
        |state| match state {
            BootstrapState::RegistryLaunched | BootstrapState::Polling => {
                println!("  {} {}", "→".dimmed(), state)
            }
            _ => tracing::debug!("Registry bootstrap: {}", state),
        },
    )
    .await?;

    println!(
        "{} Registry ready at {} ({} attempt(s))",
        "✓".green(),
        REGISTRY_URL.cyan(),
        report.attempts
    );
    if report.ui_container.is_some() {
        println!(
            "{} Registry UI at {}",
            "✓".green(),
            format!("http://localhost:{}", UI_HOST_PORT).cyan()
        );
    }
    Ok(())
}

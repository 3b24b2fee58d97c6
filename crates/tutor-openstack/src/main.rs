mod cli;
mod commands;
mod error;
mod plugin;
mod prompt;

use clap::Parser;
use cli::{Cli, Commands, OpenstackCommands};
use colored::Colorize;
use error::CommandError;
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tutor_openstack_cloud::EnvConnector;
use tutor_openstack_config::OpenStackSettings;
use tutor_openstack_registry::{DockerLauncher, HealthCheck};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(&e),
    }
}

/// Logs go to stderr; `RUST_LOG` wins over `-v`
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn report(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<CommandError>() {
        Some(command_error) => {
            match command_error {
                CommandError::Usage(message) => eprintln!("{} {}", "Error:".red().bold(), message),
                CommandError::Aborted => eprintln!("{}", command_error.to_string().yellow()),
            }
            ExitCode::from(command_error.exit_code())
        }
        None => {
            eprintln!("{} {:#}", "Error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

fn load_settings(root: Option<&Path>) -> anyhow::Result<OpenStackSettings> {
    let root = tutor_openstack_config::project_root(root)?;
    tracing::debug!("Tutor project root: {}", root.display());
    Ok(tutor_openstack_config::load(&root)?)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let command = match cli.command {
        Commands::Version => {
            println!("tutor-openstack {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Commands::PluginInfo { assets } => {
            let assets = assets.unwrap_or_else(plugin::default_assets_dir);
            let descriptor = plugin::init(&assets)?;
            println!("{}", serde_json::to_string_pretty(&descriptor)?);
            return Ok(());
        }
        Commands::Openstack(command) => command,
    };

    let connector = EnvConnector;

    match command {
        OpenstackCommands::CreateCluster { dry_run } => {
            let settings = load_settings(cli.root.as_deref())?;
            commands::cluster::handle_create(&settings, &connector, dry_run).await
        }
        OpenstackCommands::CreateTemplate { dry_run } => {
            let settings = load_settings(cli.root.as_deref())?;
            commands::template::handle_create(&settings, &connector, dry_run).await
        }
        OpenstackCommands::DeleteCluster { yes, dry_run } => {
            let settings = load_settings(cli.root.as_deref())?;
            let mut stdin = std::io::stdin().lock();
            commands::cluster::handle_delete(&settings, &connector, yes, dry_run, &mut stdin).await
        }
        // No config.yml needed
        OpenstackCommands::Registry { with_ui } => {
            let launcher = DockerLauncher::connect().await?;
            let health = HealthCheck::registry_catalog();
            commands::registry::handle(&connector, &launcher, &health, with_ui).await
        }
    }
}

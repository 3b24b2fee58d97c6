use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tutor-openstack")]
#[command(about = "Run Tutor on an OpenStack Magnum Kubernetes cluster", long_about = None)]
pub struct Cli {
    /// Tutor project root (defaults to $TUTOR_ROOT, then the user data directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub root: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage a Kubernetes cluster on OpenStack
    #[command(subcommand)]
    Openstack(OpenstackCommands),

    /// Print the plugin descriptor as JSON
    PluginInfo {
        /// Directory holding the templates/ and patches/ assets
        #[arg(long, value_name = "DIR")]
        assets: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum OpenstackCommands {
    /// Create a Kubernetes cluster on OpenStack
    CreateCluster {
        /// Don't actually interact with OpenStack, just show what would be done
        #[arg(long)]
        dry_run: bool,
    },
    /// Create a Kubernetes cluster template on OpenStack
    CreateTemplate {
        /// Don't actually interact with OpenStack, just show what would be done
        #[arg(long)]
        dry_run: bool,
    },
    /// Delete the Kubernetes cluster on OpenStack
    DeleteCluster {
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
        /// Don't actually interact with OpenStack, just show what would be done
        #[arg(long)]
        dry_run: bool,
    },
    /// Run a local container registry backed by OpenStack Swift
    Registry {
        /// Also start a web UI for browsing the registry
        #[arg(long)]
        with_ui: bool,
    },
}

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine the default Tutor project root; pass --root or set TUTOR_ROOT")]
    DataDirNotFound,

    #[error(
        "Configuration file not found: {}\n\n\
        Hint:\n  • Generate the initial configuration with `tutor config save`\n  • \
        Point --root (or TUTOR_ROOT) at an existing Tutor project root",
        path.display()
    )]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid configuration in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

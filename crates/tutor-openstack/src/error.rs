use thiserror::Error;

/// Command outcomes that map to a dedicated exit status
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    /// Invalid configuration or arguments, reported before any network call
    #[error("{0}")]
    Usage(String),

    /// The user declined a confirmation prompt
    #[error("Aborted!")]
    Aborted,
}

impl CommandError {
    pub fn exit_code(&self) -> u8 {
        match self {
            CommandError::Usage(_) => 2,
            CommandError::Aborted => 1,
        }
    }
}

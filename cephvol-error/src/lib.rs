use std::io;
use thiserror::Error;

pub type HalResult<T> = Result<T, HalError>;

/// Failures raised while handing a command to the operating system.
///
/// A command that runs and exits non-zero is not a `HalError`; the caller
/// inspects the exit status itself.
#[derive(Error, Debug)]
pub enum HalError {
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Command terminated by signal: {0}")]
    Signaled(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl HalError {
    /// Exit code reported to the automation engine for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            HalError::CommandNotFound(_) => 127,
            HalError::PermissionDenied(_) => 126,
            HalError::Signaled(_) | HalError::Io(_) => 1,
        }
    }
}

use crate::report::CommandResult;
use cephvol_error::HalError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ModuleError>;

pub const ILLEGAL_ACTION_MSG: &str =
    r#"State must either be "create" or "prepare" or "activate" or "list" or "zap" or "batch"."#;
pub const CONTAINER_ACTIVATION_MSG: &str =
    "This is not how container's activation happens, nothing to activate";
pub const NON_ZERO_RC_MSG: &str = "non-zero return code";

#[derive(Error, Debug)]
pub enum ModuleError {
    #[error("{0}")]
    Validation(String),

    #[error("{}", ILLEGAL_ACTION_MSG)]
    IllegalAction(String),

    #[error("{}", CONTAINER_ACTIVATION_MSG)]
    ContainerActivation,

    #[error("{}", NON_ZERO_RC_MSG)]
    CommandFailed(Box<CommandResult>),

    #[error("Failed to load module arguments: {0}")]
    ArgsFile(String),

    #[error(transparent)]
    Hal(#[from] HalError),
}

impl ModuleError {
    /// Message placed in the `msg` field of a failed result.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Return code reported when the error carries no command result.
    pub fn rc(&self) -> i32 {
        match self {
            ModuleError::CommandFailed(result) => result.rc,
            ModuleError::Hal(err) => err.exit_code(),
            _ => 1,
        }
    }
}

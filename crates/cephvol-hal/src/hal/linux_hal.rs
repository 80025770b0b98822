//! Linux HAL implementation spawning real processes.

use super::ProcessOps;
use crate::{HalError, HalResult};
use std::io;
use std::process::{Command, Output, Stdio};

/// Real HAL implementation for Linux systems.
#[derive(Debug, Clone, Default)]
pub struct LinuxHal;

impl LinuxHal {
    pub fn new() -> Self {
        Self
    }
}

fn map_command_err(program: &str, err: io::Error) -> HalError {
    match err.kind() {
        io::ErrorKind::NotFound => HalError::CommandNotFound(program.to_string()),
        io::ErrorKind::PermissionDenied => HalError::PermissionDenied(program.to_string()),
        _ => HalError::Io(err),
    }
}

impl ProcessOps for LinuxHal {
    fn command_output(&self, program: &str, args: &[&str]) -> HalResult<Output> {
        log::debug!("exec: {} {}", program, args.join(" "));
        // Avoid commands hanging waiting for input. `output()` drains both pipes
        // while waiting so large listings cannot deadlock.
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| map_command_err(program, e))?;

        if output.status.code().is_none() {
            return Err(HalError::Signaled(program.to_string()));
        }
        Ok(output)
    }
}

//! Process execution helpers.
//!
//! External commands are considered "world-touching" and must go through the HAL so we can
//! test workflows without spawning real processes.

use crate::HalResult;
use std::process::Output;

/// Process execution trait (external command runner).
pub trait ProcessOps {
    /// Run `program` with `args` to completion, capturing both output streams.
    ///
    /// A non-zero exit is returned as a normal `Output`; only spawn failures are errors.
    fn command_output(&self, program: &str, args: &[&str]) -> HalResult<Output>;

    /// Run a full argument vector where `argv[0]` is the program.
    fn run_argv(&self, argv: &[String]) -> HalResult<Output> {
        let (program, rest) = match argv.split_first() {
            Some(split) => split,
            None => {
                return Err(crate::HalError::CommandNotFound(String::new()));
            }
        };
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        self.command_output(program, &args)
    }
}

impl<T: ProcessOps + ?Sized> ProcessOps for &T {
    fn command_output(&self, program: &str, args: &[&str]) -> HalResult<Output> {
        (**self).command_output(program, args)
    }
}

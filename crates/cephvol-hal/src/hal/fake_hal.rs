//! Fake HAL implementation for testing.
//!
//! This implementation records all commands without executing them and replays
//! scripted results, allowing CI-safe testing without a Ceph host.

use super::ProcessOps;
use crate::{HalError, HalResult};
use std::collections::VecDeque;
#[cfg(unix)]
use std::os::unix::process::ExitStatusExt;
use std::process::{ExitStatus, Output};
use std::sync::{Arc, Mutex};

/// Operation records for testing and verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Command { program: String, args: Vec<String> },
}

impl Operation {
    /// The full argument vector, program first.
    pub fn argv(&self) -> Vec<String> {
        match self {
            Operation::Command { program, args } => {
                let mut argv = Vec::with_capacity(args.len() + 1);
                argv.push(program.clone());
                argv.extend(args.iter().cloned());
                argv
            }
        }
    }
}

/// A scripted result for the next recorded command.
#[derive(Debug, Clone)]
pub enum FakeResponse {
    Exit {
        code: i32,
        stdout: String,
        stderr: String,
    },
    NotFound,
}

impl FakeResponse {
    pub fn exit(code: i32) -> Self {
        FakeResponse::Exit {
            code,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    pub fn with_output(code: i32, stdout: &str, stderr: &str) -> Self {
        FakeResponse::Exit {
            code,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        }
    }
}

/// Shared state for FakeHal operations.
#[derive(Debug, Default)]
struct FakeHalState {
    /// All operations that were recorded
    operations: Vec<Operation>,
    /// Responses handed out in order; an empty queue means exit 0
    responses: VecDeque<FakeResponse>,
}

/// Fake HAL implementation that records operations without executing them.
#[derive(Debug, Clone, Default)]
pub struct FakeHal {
    state: Arc<Mutex<FakeHalState>>,
}

impl FakeHal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a fake that answers commands with `responses`, in order.
    pub fn with_responses(responses: impl IntoIterator<Item = FakeResponse>) -> Self {
        let hal = Self::new();
        for response in responses {
            hal.push_response(response);
        }
        hal
    }

    pub fn push_response(&self, response: FakeResponse) {
        self.state.lock().unwrap().responses.push_back(response);
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<Operation> {
        self.state.lock().unwrap().operations.clone()
    }

    /// Recorded commands as argument vectors.
    pub fn argvs(&self) -> Vec<Vec<String>> {
        self.operations().iter().map(Operation::argv).collect()
    }

    /// Get the number of operations recorded.
    pub fn operation_count(&self) -> usize {
        self.state.lock().unwrap().operations.len()
    }

    /// Check if a specific operation was recorded.
    pub fn has_operation(&self, check: impl Fn(&Operation) -> bool) -> bool {
        self.state.lock().unwrap().operations.iter().any(check)
    }

    /// Clear all recorded operations and pending responses.
    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap();
        state.operations.clear();
        state.responses.clear();
    }

    fn record_operation(&self, op: Operation) -> Option<FakeResponse> {
        let mut state = self.state.lock().unwrap();
        state.operations.push(op);
        state.responses.pop_front()
    }
}

#[cfg(unix)]
fn exit_status(code: i32) -> ExitStatus {
    ExitStatus::from_raw((code & 0xff) << 8)
}

#[cfg(not(unix))]
fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    ExitStatus::from_raw(code as u32)
}

impl ProcessOps for FakeHal {
    fn command_output(&self, program: &str, args: &[&str]) -> HalResult<Output> {
        let response = self.record_operation(Operation::Command {
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
        });
        log::debug!("FAKE HAL: {} {}", program, args.join(" "));

        match response.unwrap_or_else(|| FakeResponse::exit(0)) {
            FakeResponse::Exit {
                code,
                stdout,
                stderr,
            } => Ok(Output {
                status: exit_status(code),
                stdout: stdout.into_bytes(),
                stderr: stderr.into_bytes(),
            }),
            FakeResponse::NotFound => Err(HalError::CommandNotFound(program.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_commands_in_order() {
        let hal = FakeHal::new();
        hal.command_output("ceph-volume", &["lvm", "list"]).unwrap();
        hal.command_output("ceph-volume", &["lvm", "activate", "--all"])
            .unwrap();

        assert_eq!(hal.operation_count(), 2);
        assert_eq!(
            hal.argvs()[1],
            vec!["ceph-volume", "lvm", "activate", "--all"]
        );
        assert!(hal.has_operation(|op| matches!(
            op,
            Operation::Command { args, .. } if args.first().map(String::as_str) == Some("lvm")
        )));
    }

    #[test]
    fn replays_scripted_responses_then_defaults_to_success() {
        let hal = FakeHal::with_responses([FakeResponse::with_output(2, "out", "err")]);

        let first = hal.command_output("ceph-volume", &[]).unwrap();
        assert_eq!(first.status.code(), Some(2));
        assert_eq!(first.stdout, b"out");
        assert_eq!(first.stderr, b"err");

        let second = hal.command_output("ceph-volume", &[]).unwrap();
        assert!(second.status.success());
        assert!(second.stdout.is_empty());
    }

    #[test]
    fn not_found_response_is_a_spawn_error() {
        let hal = FakeHal::with_responses([FakeResponse::NotFound]);
        let err = hal.command_output("docker", &["run"]).unwrap_err();
        assert!(matches!(err, HalError::CommandNotFound(p) if p == "docker"));
        assert_eq!(hal.operation_count(), 1);
    }

    #[test]
    fn clear_resets_state() {
        let hal = FakeHal::with_responses([FakeResponse::exit(1)]);
        hal.command_output("a", &[]).unwrap();
        hal.push_response(FakeResponse::exit(5));
        hal.clear();
        assert_eq!(hal.operation_count(), 0);
        assert!(hal.command_output("b", &[]).unwrap().status.success());
    }
}

//! Result payload returned to the automation engine.

use crate::errors::ModuleError;
use chrono::{DateTime, Duration, Local};
use serde::{Serialize, Serializer};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// One executed command and what it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub cmd: Vec<String>,
    pub rc: i32,
    pub stdout: String,
    pub stderr: String,
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.rc == 0
    }
}

/// Trailing line terminators are noise in the engine's output.
pub fn strip_line_endings(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw)
        .trim_end_matches(['\r', '\n'])
        .to_string()
}

pub fn format_timestamp(ts: &DateTime<Local>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// `H:MM:SS.ffffff`, the layout the engine uses for task deltas.
pub fn format_delta(delta: Duration) -> String {
    let micros = delta.num_microseconds().unwrap_or(i64::MAX).max(0);
    let secs = micros / 1_000_000;
    format!(
        "{}:{:02}:{:02}.{:06}",
        secs / 3600,
        (secs / 60) % 60,
        secs % 60,
        micros % 1_000_000
    )
}

/// What a successful dispatch did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The last command that ran, with `start` covering the whole invocation.
    Changed(CommandResult),
    /// The probe found existing OSD metadata on the data device.
    AlreadyInUse {
        data: String,
        probe: CommandResult,
    },
}

fn rc_or_empty<S: Serializer>(rc: &Option<i32>, s: S) -> Result<S::Ok, S::Error> {
    match rc {
        Some(rc) => s.serialize_i32(*rc),
        None => s.serialize_str(""),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModuleResult {
    pub changed: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub failed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    /// Empty string when nothing ran.
    #[serde(serialize_with = "rc_or_empty")]
    pub rc: Option<i32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cmd: Vec<String>,
    pub stdout: String,
    pub stderr: String,
    pub start: String,
    pub end: String,
    pub delta: String,
}

impl ModuleResult {
    /// Nothing was run: check mode.
    pub fn unchanged() -> Self {
        Self::default()
    }

    fn with_command(result: &CommandResult) -> Self {
        Self {
            changed: false,
            failed: false,
            msg: None,
            rc: Some(result.rc),
            cmd: result.cmd.clone(),
            stdout: result.stdout.clone(),
            stderr: result.stderr.clone(),
            start: format_timestamp(&result.start),
            end: format_timestamp(&result.end),
            delta: format_delta(result.end - result.start),
        }
    }

    pub fn from_outcome(outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Changed(result) => Self {
                changed: true,
                ..Self::with_command(result)
            },
            Outcome::AlreadyInUse { data, probe } => {
                let msg = format!("skipped, since {data} is already used for an osd");
                Self {
                    changed: false,
                    rc: Some(0),
                    msg: Some(msg.clone()),
                    stdout: msg,
                    stderr: String::new(),
                    ..Self::with_command(probe)
                }
            }
        }
    }

    pub fn from_error(err: &ModuleError) -> Self {
        let base = match err {
            ModuleError::CommandFailed(result) => Self::with_command(result),
            _ => Self {
                rc: Some(err.rc()),
                ..Self::default()
            },
        };
        Self {
            changed: false,
            failed: true,
            msg: Some(err.message()),
            ..base
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

//! Runs the commands an action needs, one at a time, and maps exit codes to outcomes.

use crate::builder::CommandBuilder;
use crate::container::ContainerContext;
use crate::errors::{ModuleError, Result};
use crate::params::{Action, OsdParams};
use crate::report::{strip_line_endings, CommandResult, ModuleResult, Outcome};
use cephvol_hal::ProcessOps;
use chrono::Local;

/// A fully resolved module invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Invocation {
    pub action: Action,
    pub params: OsdParams,
    pub check_mode: bool,
}

pub struct Dispatcher<P: ProcessOps> {
    hal: P,
    container: ContainerContext,
}

impl<P: ProcessOps> Dispatcher<P> {
    pub fn new(hal: P, container: ContainerContext) -> Self {
        Self { hal, container }
    }

    fn builder(&self) -> CommandBuilder<'_> {
        CommandBuilder::new(&self.container)
    }

    /// Run one argument vector to completion. A non-zero exit is not an error here.
    pub fn execute(&self, cmd: Vec<String>) -> Result<CommandResult> {
        log::info!("running: {}", cmd.join(" "));
        let start = Local::now();
        let output = self.hal.run_argv(&cmd)?;
        let end = Local::now();

        // LinuxHal reports signal deaths as errors, so a missing code is unexpected.
        let rc = output.status.code().unwrap_or(1);
        Ok(CommandResult {
            cmd,
            rc,
            stdout: strip_line_endings(&output.stdout),
            stderr: strip_line_endings(&output.stderr),
            start,
            end,
        })
    }

    /// Like [`Dispatcher::execute`], but a non-zero exit becomes `CommandFailed`.
    fn execute_checked(&self, cmd: Vec<String>) -> Result<CommandResult> {
        let result = self.execute(cmd)?;
        if !result.success() {
            log::warn!(
                "command exited with rc={}: {}",
                result.rc,
                result.cmd.join(" ")
            );
            return Err(ModuleError::CommandFailed(Box::new(result)));
        }
        Ok(result)
    }

    pub fn dispatch(&self, action: Action, params: &OsdParams) -> Result<Outcome> {
        let started = Local::now();
        let outcome = self.dispatch_steps(action, params);

        // Timestamps on the reported command span the whole invocation.
        match outcome {
            Ok(Outcome::Changed(mut last)) => {
                last.start = started;
                Ok(Outcome::Changed(last))
            }
            Err(ModuleError::CommandFailed(mut last)) => {
                last.start = started;
                Err(ModuleError::CommandFailed(last))
            }
            other => other,
        }
    }

    fn dispatch_steps(&self, action: Action, params: &OsdParams) -> Result<Outcome> {
        let builder = self.builder();
        match action {
            Action::Create | Action::Prepare => {
                if action == Action::Create && self.container.is_containerized() {
                    return Err(ModuleError::ContainerActivation);
                }
                // Build everything up front so validation fails before the probe runs.
                let probe_cmd = builder.list(params)?;
                let prepare_cmd = builder.prepare(params)?;

                let probe = self.execute(probe_cmd)?;
                if probe.success() {
                    let data = params.require_data(action)?.reference();
                    log::info!("{} already carries OSD metadata, nothing to do", data);
                    return Ok(Outcome::AlreadyInUse { data, probe });
                }
                log::debug!("probe exited with rc={}, preparing", probe.rc);

                let prepared = self.execute_checked(prepare_cmd)?;
                if action == Action::Prepare {
                    return Ok(Outcome::Changed(prepared));
                }
                let activated = self.execute_checked(builder.activate())?;
                Ok(Outcome::Changed(activated))
            }
            Action::Activate => {
                if self.container.is_containerized() {
                    return Err(ModuleError::ContainerActivation);
                }
                Ok(Outcome::Changed(self.execute_checked(builder.activate())?))
            }
            Action::Zap => Ok(Outcome::Changed(self.execute_checked(builder.zap(params)?)?)),
            Action::List => Ok(Outcome::Changed(self.execute_checked(builder.list(params)?)?)),
            Action::Batch => Ok(Outcome::Changed(self.execute_checked(builder.batch(params)?)?)),
        }
    }

    /// Run an invocation and fold every outcome, including failures, into the engine payload.
    pub fn run(&self, invocation: &Invocation) -> ModuleResult {
        if invocation.check_mode {
            log::info!("check mode: not running {}", invocation.action);
            return ModuleResult::unchanged();
        }

        match self.dispatch(invocation.action, &invocation.params) {
            Ok(outcome) => ModuleResult::from_outcome(&outcome),
            Err(err) => {
                log::warn!("{} failed: {}", invocation.action, err);
                ModuleResult::from_error(&err)
            }
        }
    }
}

use anyhow::Context;
use cephvol_core::cli::Cli;
use cephvol_core::{Dispatcher, ModuleError, ModuleResult};
use cephvol_hal::{LinuxHal, ProcessOps};
use clap::Parser;
use std::io::Write;

/// Resolve the invocation from `cli` and run it against `hal`.
///
/// Argument problems (unreadable args file, unknown action) are reported in the
/// payload like any other failure; nothing is run in that case.
pub fn execute<P: ProcessOps>(cli: &Cli, hal: P) -> ModuleResult {
    let container = cli.container();
    if let Some(image) = &container.image {
        log::info!("🐳 running ceph-volume from image {}", image);
    }

    match cli.invocation() {
        Ok(invocation) => Dispatcher::new(hal, container).run(&invocation),
        Err(err) => {
            if let ModuleError::IllegalAction(action) = &err {
                log::warn!("unknown action {:?}", action);
            }
            log::warn!("rejecting module arguments: {}", err);
            ModuleResult::from_error(&err)
        }
    }
}

/// Print the payload as a single JSON document and return the process exit code.
pub fn emit(result: &ModuleResult, out: &mut impl Write) -> anyhow::Result<i32> {
    let json = result.to_json().context("failed to serialise module result")?;
    writeln!(out, "{}", json).context("failed to write module result")?;
    Ok(if result.failed { 1 } else { 0 })
}

pub fn run() -> anyhow::Result<i32> {
    let cli = Cli::parse();
    cephvol_core::logging::init_with(cli.log_file.as_deref());

    let result = execute(&cli, LinuxHal::new());
    let stdout = std::io::stdout();
    emit(&result, &mut stdout.lock())
}

//! Command builder and dispatcher for `ceph-volume lvm`.
//!
//! `cephvol-core` turns typed OSD parameters into `ceph-volume` argument
//! vectors, runs them through the process HAL and folds the outcome into the
//! payload the automation engine expects.

pub mod args_file;
pub mod builder;
pub mod cli;
pub mod container;
pub mod dispatcher;
pub mod errors;
pub mod logging;
pub mod params;
pub mod report;

pub use builder::CommandBuilder;
pub use container::ContainerContext;
pub use dispatcher::{Dispatcher, Invocation};
pub use errors::ModuleError;
pub use params::{Action, DeviceSpec, Objectstore, OsdParams};
pub use report::{CommandResult, ModuleResult, Outcome};

//! Process abstraction for the ceph-volume module.
//!
//! Every external command goes through [`ProcessOps`] so the dispatcher can be
//! exercised against [`FakeHal`] without a Ceph host.

pub mod hal;

pub use cephvol_error::{HalError, HalResult};
pub use hal::{FakeHal, FakeResponse, LinuxHal, Operation, ProcessOps};

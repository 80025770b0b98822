//! HAL trait definitions and implementations.
//!
//! Provides both the real (LinuxHal) and the recording (FakeHal) process runner.

pub mod fake_hal;
pub mod linux_hal;
pub mod process_ops;

pub use fake_hal::{FakeHal, FakeResponse, Operation};
pub use linux_hal::LinuxHal;
pub use process_ops::ProcessOps;

//! CLI argument parsing for the ceph_volume module
//!
//! When the automation engine runs the module it passes the path of a JSON args
//! file; the long flags exist for running the same logic by hand.

use crate::args_file::{self, ModuleArgs};
use crate::container::{
    ContainerContext, CONTAINER_BINARY_ENV, CONTAINER_IMAGE_ENV, DEFAULT_CONTAINER_BINARY,
};
use crate::dispatcher::Invocation;
use crate::errors::Result;
use crate::params::{Objectstore, DEFAULT_CLUSTER};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ceph_volume")]
#[command(version)]
#[command(about = "Create, prepare, activate, list and zap Ceph OSDs with ceph-volume")]
pub struct Cli {
    /// JSON file with module arguments; when given, the parameter flags below are ignored
    #[arg(value_name = "ARGS_FILE")]
    pub args_file: Option<PathBuf>,

    /// create, prepare, activate, zap, batch or list
    #[arg(long, default_value = "create")]
    pub action: String,

    /// Ceph cluster name
    #[arg(long, default_value = DEFAULT_CLUSTER)]
    pub cluster: String,

    /// OSD backend
    #[arg(long, value_enum, default_value_t = Objectstore::Bluestore)]
    pub objectstore: Objectstore,

    /// Logical volume or device holding the OSD data
    #[arg(long)]
    pub data: Option<String>,

    /// Volume group of --data, when it is a logical volume
    #[arg(long)]
    pub data_vg: Option<String>,

    /// Logical volume or partition for the filestore journal
    #[arg(long)]
    pub journal: Option<String>,

    #[arg(long)]
    pub journal_vg: Option<String>,

    /// Partition or logical volume for block.db (bluestore)
    #[arg(long)]
    pub db: Option<String>,

    #[arg(long)]
    pub db_vg: Option<String>,

    /// Partition or logical volume for block.wal (bluestore)
    #[arg(long)]
    pub wal: Option<String>,

    #[arg(long)]
    pub wal_vg: Option<String>,

    /// CRUSH device class assigned to the new OSD
    #[arg(long)]
    pub crush_device_class: Option<String>,

    /// Encrypt the OSD with dmcrypt
    #[arg(long)]
    pub dmcrypt: bool,

    /// Device for `lvm batch` (repeatable)
    #[arg(long = "batch-device", value_name = "DEVICE")]
    pub batch_devices: Vec<String>,

    /// OSDs to create per batch device
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub osds_per_device: i64,

    /// Report what would happen without running anything
    #[arg(long)]
    pub check: bool,

    /// Run ceph-volume inside this container image instead of on the host
    #[arg(long, env = CONTAINER_IMAGE_ENV)]
    pub container_image: Option<String>,

    /// Container runtime used with --container-image
    #[arg(long, env = CONTAINER_BINARY_ENV, default_value = DEFAULT_CONTAINER_BINARY)]
    pub container_binary: String,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn container(&self) -> ContainerContext {
        ContainerContext::new(
            self.container_image.clone(),
            Some(self.container_binary.clone()),
        )
    }

    /// Parameters given as flags, in the same loose form an args file carries.
    pub fn module_args(&self) -> ModuleArgs {
        ModuleArgs {
            cluster: Some(self.cluster.clone()),
            objectstore: Some(self.objectstore.to_string()),
            action: Some(self.action.clone()),
            data: self.data.clone(),
            data_vg: self.data_vg.clone(),
            journal: self.journal.clone(),
            journal_vg: self.journal_vg.clone(),
            db: self.db.clone(),
            db_vg: self.db_vg.clone(),
            wal: self.wal.clone(),
            wal_vg: self.wal_vg.clone(),
            crush_device_class: self.crush_device_class.clone(),
            dmcrypt: Some(self.dmcrypt),
            batch_devices: Some(self.batch_devices.clone()),
            osds_per_device: Some(self.osds_per_device),
        }
    }

    pub fn invocation(&self) -> Result<Invocation> {
        match &self.args_file {
            Some(path) => {
                let mut invocation = args_file::load_args_file(path)?;
                invocation.check_mode |= self.check;
                Ok(invocation)
            }
            None => self.module_args().into_invocation(self.check),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{Action, DeviceSpec};
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_become_an_invocation() {
        let cli = Cli::try_parse_from([
            "ceph_volume",
            "--action",
            "zap",
            "--data",
            "data-lv",
            "--data-vg",
            "data-vg",
            "--journal",
            "/dev/sdc1",
            "--container-binary",
            "podman",
        ])
        .unwrap();
        let inv = cli.invocation().unwrap();
        assert_eq!(inv.action, Action::Zap);
        assert_eq!(inv.params.data, Some(DeviceSpec::in_vg("data-lv", "data-vg")));
        assert_eq!(inv.params.journal, Some(DeviceSpec::new("/dev/sdc1")));
        assert_eq!(cli.container().binary, "podman");
    }

    #[test]
    fn batch_flags() {
        let cli = Cli::try_parse_from([
            "ceph_volume",
            "--action",
            "batch",
            "--objectstore",
            "filestore",
            "--batch-device",
            "/dev/sdb",
            "--batch-device",
            "/dev/sdc",
            "--osds-per-device",
            "-1",
            "--check",
        ])
        .unwrap();
        let inv = cli.invocation().unwrap();
        assert_eq!(inv.params.objectstore, Objectstore::Filestore);
        assert_eq!(inv.params.batch_devices, vec!["/dev/sdb", "/dev/sdc"]);
        assert_eq!(inv.params.osds_per_device, -1);
        assert!(inv.check_mode);
    }

    #[test]
    fn unknown_action_surfaces_at_resolution() {
        let cli = Cli::try_parse_from(["ceph_volume", "--action", "destroy"]).unwrap();
        assert!(cli.invocation().is_err());
    }
}

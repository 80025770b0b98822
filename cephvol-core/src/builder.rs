//! `ceph-volume lvm` argument vectors.
//!
//! The builder is pure: it never runs anything, it only returns argv or a
//! validation error.

use crate::container::ContainerContext;
use crate::errors::{ModuleError, Result};
use crate::params::{Action, OsdParams};

pub const CEPH_VOLUME: &str = "ceph-volume";

#[derive(Debug, Clone, Copy)]
pub struct CommandBuilder<'a> {
    container: &'a ContainerContext,
}

impl<'a> CommandBuilder<'a> {
    pub fn new(container: &'a ContainerContext) -> Self {
        Self { container }
    }

    /// `ceph-volume [--cluster <name>] lvm <subcommand>`, wrapped for the container if needed.
    fn base(&self, subcommand: &str, cluster: Option<&str>) -> Vec<String> {
        let mut cmd = self.container.exec_prefix(CEPH_VOLUME);
        if let Some(cluster) = cluster {
            cmd.push("--cluster".to_string());
            cmd.push(cluster.to_string());
        }
        cmd.push("lvm".to_string());
        cmd.push(subcommand.to_string());
        cmd
    }

    /// Probe a device for existing Ceph LVM metadata.
    pub fn list(&self, params: &OsdParams) -> Result<Vec<String>> {
        let data = params.require_data(Action::List)?;
        let mut cmd = self.base("list", params.explicit_cluster());
        cmd.push(data.reference());
        cmd.push("--format=json".to_string());
        Ok(cmd)
    }

    pub fn prepare(&self, params: &OsdParams) -> Result<Vec<String>> {
        let data = params.require_data(Action::Prepare)?;
        let mut cmd = self.base("prepare", params.explicit_cluster());
        cmd.push(params.objectstore.flag());
        cmd.push("--data".to_string());
        cmd.push(data.reference());

        if let Some(journal) = &params.journal {
            cmd.push("--journal".to_string());
            cmd.push(journal.reference());
        }
        if let Some(db) = &params.db {
            cmd.push("--block.db".to_string());
            cmd.push(db.reference());
        }
        if let Some(wal) = &params.wal {
            cmd.push("--block.wal".to_string());
            cmd.push(wal.reference());
        }
        push_common_flags(&mut cmd, params);
        Ok(cmd)
    }

    /// Activate every prepared OSD on the host. Always runs directly on the host.
    pub fn activate(&self) -> Vec<String> {
        vec![
            CEPH_VOLUME.to_string(),
            "lvm".to_string(),
            "activate".to_string(),
            "--all".to_string(),
        ]
    }

    /// Zap every device that backs the OSD. `--destroy` also removes the LVs
    /// ceph-volume created on a raw data device.
    pub fn zap(&self, params: &OsdParams) -> Result<Vec<String>> {
        let data = params.require_data(Action::Zap)?;
        let mut cmd = self.base("zap", params.explicit_cluster());
        cmd.push("--destroy".to_string());
        cmd.push(data.reference());
        cmd.extend(
            [&params.journal, &params.db, &params.wal]
                .into_iter()
                .flatten()
                .map(|spec| spec.reference()),
        );
        Ok(cmd)
    }

    pub fn batch(&self, params: &OsdParams) -> Result<Vec<String>> {
        if params.osds_per_device < 1 {
            return Err(ModuleError::Validation(
                "osds_per_device must be greater than 0 if action is \"batch\"".to_string(),
            ));
        }
        if params.batch_devices.is_empty() {
            return Err(ModuleError::Validation(
                "batch_devices must be provided if action is \"batch\"".to_string(),
            ));
        }

        let mut cmd = self.base("batch", params.explicit_cluster());
        cmd.push(params.objectstore.flag());
        cmd.push("--yes".to_string());
        cmd.push("--no-systemd".to_string());
        push_common_flags(&mut cmd, params);
        if params.osds_per_device > 1 {
            cmd.push("--osds-per-device".to_string());
            cmd.push(params.osds_per_device.to_string());
        }
        cmd.extend(params.batch_devices.iter().cloned());
        Ok(cmd)
    }
}

fn push_common_flags(cmd: &mut Vec<String>, params: &OsdParams) {
    if let Some(class) = params.crush_device_class.as_deref().filter(|c| !c.is_empty()) {
        cmd.push("--crush-device-class".to_string());
        cmd.push(class.to_string());
    }
    if params.dmcrypt {
        cmd.push("--dmcrypt".to_string());
    }
}

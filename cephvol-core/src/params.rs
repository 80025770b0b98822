//! Typed OSD parameters.
//!
//! Everything the builder needs is carried here with explicit optional fields;
//! nothing is looked up from a loose dictionary at build time.

use crate::errors::{ModuleError, Result};
use clap::ValueEnum;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_CLUSTER: &str = "ceph";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    #[default]
    Create,
    Prepare,
    Activate,
    Zap,
    Batch,
    List,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Create,
        Action::Prepare,
        Action::Activate,
        Action::Zap,
        Action::Batch,
        Action::List,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Prepare => "prepare",
            Action::Activate => "activate",
            Action::Zap => "zap",
            Action::Batch => "batch",
            Action::List => "list",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ModuleError;

    fn from_str(s: &str) -> Result<Self> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| ModuleError::IllegalAction(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Objectstore {
    /// BlueStore, raw block backend (default)
    #[default]
    Bluestore,
    /// FileStore, XFS backed with a journal
    Filestore,
}

impl Objectstore {
    /// The `ceph-volume` flag selecting this backend.
    pub fn flag(&self) -> String {
        format!("--{}", self)
    }
}

impl fmt::Display for Objectstore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Objectstore::Bluestore => write!(f, "bluestore"),
            Objectstore::Filestore => write!(f, "filestore"),
        }
    }
}

impl FromStr for Objectstore {
    type Err = ModuleError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "bluestore" => Ok(Objectstore::Bluestore),
            "filestore" => Ok(Objectstore::Filestore),
            other => Err(ModuleError::Validation(format!(
                "objectstore must be one of bluestore, filestore (got {other:?})"
            ))),
        }
    }
}

/// A device, partition or logical volume, optionally qualified by its volume group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSpec {
    pub name: String,
    pub vg: Option<String>,
}

impl DeviceSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vg: None,
        }
    }

    pub fn in_vg(name: impl Into<String>, vg: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vg: Some(vg.into()),
        }
    }

    /// Build from the loose `name`/`vg` pair the automation engine hands over.
    /// Empty strings count as unset; a group without a name yields `None`.
    pub fn from_parts(name: Option<String>, vg: Option<String>) -> Option<Self> {
        let name = name.filter(|n| !n.is_empty())?;
        Some(Self {
            name,
            vg: vg.filter(|v| !v.is_empty()),
        })
    }

    /// The identifier passed to `ceph-volume`.
    pub fn reference(&self) -> String {
        match &self.vg {
            Some(vg) => format!("{}/{}", vg, self.name),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for DeviceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reference())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsdParams {
    pub cluster: String,
    pub objectstore: Objectstore,
    pub data: Option<DeviceSpec>,
    /// Filestore only by convention; not enforced.
    pub journal: Option<DeviceSpec>,
    /// Bluestore only by convention; not enforced.
    pub db: Option<DeviceSpec>,
    pub wal: Option<DeviceSpec>,
    pub crush_device_class: Option<String>,
    pub dmcrypt: bool,
    pub batch_devices: Vec<String>,
    pub osds_per_device: i64,
}

impl Default for OsdParams {
    fn default() -> Self {
        Self {
            cluster: DEFAULT_CLUSTER.to_string(),
            objectstore: Objectstore::default(),
            data: None,
            journal: None,
            db: None,
            wal: None,
            crush_device_class: None,
            dmcrypt: false,
            batch_devices: Vec::new(),
            osds_per_device: 1,
        }
    }
}

impl OsdParams {
    /// The cluster name, if it differs from the default and must be passed explicitly.
    pub fn explicit_cluster(&self) -> Option<&str> {
        if self.cluster.is_empty() || self.cluster == DEFAULT_CLUSTER {
            None
        } else {
            Some(&self.cluster)
        }
    }

    pub fn require_data(&self, action: Action) -> Result<&DeviceSpec> {
        self.data.as_ref().ok_or_else(|| {
            ModuleError::Validation(format!(
                "data must be provided if action is \"{action}\""
            ))
        })
    }
}

//! Module arguments as handed over by the automation engine.
//!
//! Binary modules receive the path of a JSON file holding the task parameters
//! plus engine-internal `_ansible_*` keys. Values arrive loosely typed (booleans
//! as `"yes"`, integers as strings, lists as comma separated strings), so the
//! deserializers below accept those spellings before anything is converted
//! into [`OsdParams`].

use crate::dispatcher::Invocation;
use crate::errors::{ModuleError, Result};
use crate::params::{Action, DeviceSpec, Objectstore, OsdParams, DEFAULT_CLUSTER};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

const INTERNAL_PREFIX: &str = "_ansible_";
const CHECK_MODE_KEY: &str = "_ansible_check_mode";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModuleArgs {
    pub cluster: Option<String>,
    pub objectstore: Option<String>,
    pub action: Option<String>,
    pub data: Option<String>,
    pub data_vg: Option<String>,
    pub journal: Option<String>,
    pub journal_vg: Option<String>,
    pub db: Option<String>,
    pub db_vg: Option<String>,
    pub wal: Option<String>,
    pub wal_vg: Option<String>,
    pub crush_device_class: Option<String>,
    #[serde(deserialize_with = "loose_bool")]
    pub dmcrypt: Option<bool>,
    #[serde(deserialize_with = "loose_list")]
    pub batch_devices: Option<Vec<String>>,
    #[serde(deserialize_with = "loose_int")]
    pub osds_per_device: Option<i64>,
}

impl ModuleArgs {
    /// Resolve defaults and enums into a typed invocation.
    pub fn into_invocation(self, check_mode: bool) -> Result<Invocation> {
        let action = match self.action.as_deref() {
            None | Some("") => Action::default(),
            Some(other) => other.parse()?,
        };
        let objectstore = match self.objectstore.as_deref() {
            None | Some("") => Objectstore::default(),
            Some(other) => other.parse()?,
        };

        let params = OsdParams {
            cluster: self
                .cluster
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_CLUSTER.to_string()),
            objectstore,
            data: DeviceSpec::from_parts(self.data, self.data_vg),
            journal: DeviceSpec::from_parts(self.journal, self.journal_vg),
            db: DeviceSpec::from_parts(self.db, self.db_vg),
            wal: DeviceSpec::from_parts(self.wal, self.wal_vg),
            crush_device_class: self.crush_device_class.filter(|c| !c.is_empty()),
            dmcrypt: self.dmcrypt.unwrap_or(false),
            batch_devices: self.batch_devices.unwrap_or_default(),
            osds_per_device: self.osds_per_device.unwrap_or(1),
        };

        Ok(Invocation {
            action,
            params,
            check_mode,
        })
    }
}

/// Parse an args document, splitting engine-internal keys from task parameters.
pub fn parse_args(raw: &str) -> Result<Invocation> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| ModuleError::ArgsFile(e.to_string()))?;
    let Value::Object(map) = value else {
        return Err(ModuleError::ArgsFile(
            "expected a JSON object of parameters".to_string(),
        ));
    };

    let mut check_mode = false;
    let mut params = Map::new();
    for (key, value) in map {
        if key == CHECK_MODE_KEY {
            check_mode = parse_loose_bool(&value).unwrap_or(false);
        } else if !key.starts_with(INTERNAL_PREFIX) {
            params.insert(key, value);
        }
    }

    let args: ModuleArgs = serde_json::from_value(Value::Object(params))
        .map_err(|e| ModuleError::ArgsFile(e.to_string()))?;
    args.into_invocation(check_mode)
}

pub fn load_args_file(path: &Path) -> Result<Invocation> {
    let raw = fs::read_to_string(path)
        .map_err(|e| ModuleError::ArgsFile(format!("{}: {}", path.display(), e)))?;
    log::debug!("loaded module args from {}", path.display());
    parse_args(&raw)
}

fn parse_loose_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        Value::String(s) => match s.to_ascii_lowercase().as_str() {
            "yes" | "on" | "true" | "1" | "y" => Some(true),
            "no" | "off" | "false" | "0" | "n" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn loose_bool<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<Option<bool>, D::Error> {
    let value = Value::deserialize(de)?;
    if value.is_null() {
        return Ok(None);
    }
    parse_loose_bool(&value)
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom(format!("expected a boolean, got {value}")))
}

fn loose_int<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<Option<i64>, D::Error> {
    match Value::deserialize(de)? {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("expected an integer, got {n}"))),
        Value::String(s) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("expected an integer, got {s:?}"))),
        other => Err(serde::de::Error::custom(format!(
            "expected an integer, got {other}"
        ))),
    }
}

fn loose_list<'de, D: Deserializer<'de>>(
    de: D,
) -> std::result::Result<Option<Vec<String>>, D::Error> {
    match Value::deserialize(de)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(
            s.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                other => Err(serde::de::Error::custom(format!(
                    "expected a device path, got {other}"
                ))),
            })
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(Some),
        other => Err(serde::de::Error::custom(format!(
            "expected a list of devices, got {other}"
        ))),
    }
}

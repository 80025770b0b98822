use cephvol_core::cli::Cli;
use cephvol_hal::{FakeHal, FakeResponse};
use cephvol_module::{emit, execute};
use clap::Parser;
use std::io::Write;
use tempfile::NamedTempFile;

fn args_file(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create args file");
    file.write_all(json.as_bytes()).expect("write args file");
    file
}

fn cli_for(file: &NamedTempFile, extra: &[&str]) -> Cli {
    let path = file.path().to_str().expect("utf-8 temp path");
    let mut argv = vec!["ceph_volume", path, "--container-image", ""];
    argv.extend_from_slice(extra);
    Cli::try_parse_from(argv).expect("parse cli")
}

fn payload(result: &cephvol_core::ModuleResult) -> (i32, serde_json::Value) {
    let mut out = Vec::new();
    let code = emit(result, &mut out).expect("emit result");
    let json = serde_json::from_slice(&out).expect("result is json");
    (code, json)
}

#[test]
fn args_file_create_runs_three_steps() {
    let file = args_file(r#"{"objectstore": "bluestore", "data": "/dev/sdc", "action": "create"}"#);
    let hal = FakeHal::with_responses([FakeResponse::exit(1)]);

    let result = execute(&cli_for(&file, &[]), &hal);
    let (code, json) = payload(&result);

    assert_eq!(code, 0);
    assert_eq!(hal.operation_count(), 3);
    assert_eq!(json["changed"], true);
    assert_eq!(json["rc"], 0);
    assert_eq!(
        json["cmd"],
        serde_json::json!(["ceph-volume", "lvm", "activate", "--all"])
    );
    assert!(json.get("failed").is_none());
}

#[test]
fn args_file_check_mode_runs_nothing() {
    let file = args_file(r#"{"action": "zap", "data": "/dev/sdb", "_ansible_check_mode": true}"#);
    let hal = FakeHal::new();

    let result = execute(&cli_for(&file, &[]), &hal);
    let (code, json) = payload(&result);

    assert_eq!(code, 0);
    assert_eq!(hal.operation_count(), 0);
    assert_eq!(json["changed"], false);
}

#[test]
fn cli_check_flag_overrides_args_file() {
    let file = args_file(r#"{"action": "zap", "data": "/dev/sdb"}"#);
    let hal = FakeHal::new();

    let result = execute(&cli_for(&file, &["--check"]), &hal);

    assert!(!result.changed);
    assert_eq!(hal.operation_count(), 0);
}

#[test]
fn illegal_action_fails_before_dispatch() {
    let file = args_file(r#"{"action": "destroy", "data": "/dev/sdb"}"#);
    let hal = FakeHal::new();

    let result = execute(&cli_for(&file, &[]), &hal);
    let (code, json) = payload(&result);

    assert_eq!(code, 1);
    assert_eq!(hal.operation_count(), 0);
    assert_eq!(json["failed"], true);
    assert_eq!(json["changed"], false);
    assert_eq!(json["rc"], 1);
    assert!(json["msg"]
        .as_str()
        .unwrap()
        .starts_with("State must either be \"create\""));
}

#[test]
fn containerized_activate_is_rejected() {
    let file = args_file(r#"{"action": "activate"}"#);
    let path = file.path().to_str().unwrap();
    let cli = Cli::try_parse_from([
        "ceph_volume",
        path,
        "--container-image",
        "quay.io/ceph/daemon:latest",
    ])
    .unwrap();
    let hal = FakeHal::new();

    let result = execute(&cli, &hal);
    let (code, json) = payload(&result);

    assert_eq!(code, 1);
    assert_eq!(hal.operation_count(), 0);
    assert_eq!(
        json["msg"],
        "This is not how container's activation happens, nothing to activate"
    );
}

#[test]
fn missing_args_file_is_reported() {
    let cli = Cli::try_parse_from([
        "ceph_volume",
        "/nonexistent/ceph_volume_args.json",
        "--container-image",
        "",
    ])
    .unwrap();
    let hal = FakeHal::new();

    let result = execute(&cli, &hal);

    assert!(result.failed);
    assert_eq!(hal.operation_count(), 0);
    assert!(result
        .msg
        .as_deref()
        .unwrap()
        .starts_with("Failed to load module arguments"));
}

#[test]
fn flags_without_args_file() {
    let cli = Cli::try_parse_from([
        "ceph_volume",
        "--action",
        "batch",
        "--batch-device",
        "/dev/sdb",
        "--dmcrypt",
        "--container-image",
        "",
    ])
    .unwrap();
    let hal = FakeHal::new();

    let result = execute(&cli, &hal);

    assert!(result.changed);
    assert_eq!(
        hal.argvs()[0],
        vec![
            "ceph-volume",
            "lvm",
            "batch",
            "--bluestore",
            "--yes",
            "--no-systemd",
            "--dmcrypt",
            "/dev/sdb",
        ]
    );
}

#[test]
fn tool_failure_exit_code_and_output() {
    let file = args_file(r#"{"action": "list", "data": "/dev/sdz"}"#);
    let hal = FakeHal::with_responses([FakeResponse::with_output(
        2,
        "",
        "No valid Ceph lvm devices found\n",
    )]);

    let result = execute(&cli_for(&file, &[]), &hal);
    let (code, json) = payload(&result);

    assert_eq!(code, 1);
    assert_eq!(json["rc"], 2);
    assert_eq!(json["msg"], "non-zero return code");
    assert_eq!(json["stderr"], "No valid Ceph lvm devices found");
    assert_eq!(json["changed"], false);
}

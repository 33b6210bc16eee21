//! Integration tests for the logroll binary
//!
//! Each test writes a config pointing at temporary directories and runs the real binary.

use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;
use std::path::PathBuf;
use tempfile::{tempdir, TempDir};

struct Workspace {
    _dir: TempDir,
    logs: PathBuf,
    baks: PathBuf,
    config: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        let logs = dir.path().join("logs");
        let baks = dir.path().join("baks");
        fs::create_dir(&logs).unwrap();

        let config = dir.path().join("logroll.toml");
        fs::write(
            &config,
            format!("source_dir = {:?}\narchive_dir = {:?}\n", logs, baks),
        )
        .unwrap();

        Self { _dir: dir, logs, baks, config }
    }

    fn write_log(&self, name: &str, content: &str) {
        fs::write(self.logs.join(name), content).unwrap();
    }

    fn logroll(&self) -> Command {
        let mut cmd = Command::cargo_bin("logroll").expect("Binary not found");
        cmd.arg("--config")
            .arg(&self.config)
            .arg("--no-color")
            .env_remove("RUST_LOG");
        cmd
    }

    fn scan_json(&self) -> serde_json::Value {
        let output = self.logroll().args(["scan", "--json"]).assert().success();
        serde_json::from_slice(&output.get_output().stdout).unwrap()
    }
}

#[test]
fn test_once_archives_and_show_prints() {
    let ws = Workspace::new();
    ws.write_log("jniorboot.log.bak", "boot 1\nboot 2\n");

    ws.logroll().arg("once").assert().success().stdout(contains("1 new"));
    assert!(ws.baks.join("jniorboot.log.gz").is_file());

    ws.logroll()
        .args(["show", "jniorboot.log.gz"])
        .assert()
        .success()
        .stdout("boot 1\nboot 2\n");
}

#[test]
fn test_scan_reports_without_writing() {
    let ws = Workspace::new();
    ws.write_log("a.log.bak", "a\n");

    let plan = ws.scan_json();
    assert_eq!(plan[0]["entry"], "a.log.gz");
    assert_eq!(plan[0]["decision"], "new");
    assert!(!ws.baks.exists());

    ws.logroll().arg("once").assert().success();

    let plan = ws.scan_json();
    assert_eq!(plan[0]["decision"], "skip");
}

#[test]
fn test_show_lists_entries() {
    let ws = Workspace::new();
    ws.write_log("a.log.bak", "a\n");
    ws.write_log("b.log.bak", "b\n");
    ws.logroll().arg("once").assert().success();

    ws.logroll()
        .arg("show")
        .assert()
        .success()
        .stdout(contains("a.log.gz").and(contains("b.log.gz")));
}

#[test]
fn test_show_missing_entry_fails() {
    let ws = Workspace::new();
    ws.logroll()
        .args(["show", "absent.log.gz"])
        .assert()
        .code(1)
        .stderr(contains("absent.log.gz"));
}

#[test]
fn test_invalid_config_fails() {
    let ws = Workspace::new();
    fs::write(&ws.config, "max_archive_bytes = 0\n").unwrap();

    ws.logroll()
        .arg("scan")
        .assert()
        .code(1)
        .stderr(contains("max_archive_bytes"));
}

#[test]
fn test_once_refuses_while_another_instance_runs() {
    let ws = Workspace::new();
    ws.write_log("a.log.bak", "a\n");
    let _running = logroll_store::InstanceLock::acquire(&ws.baks).unwrap();
    let staging = ws.baks.join(".logroll-inflight.tmp");
    fs::write(&staging, b"partial").unwrap();

    ws.logroll().arg("once").assert().code(1).stderr(contains("lock"));

    assert!(staging.exists());
    assert!(!ws.baks.join("a.log.gz").exists());
}

//! Binary-level checks that invalid configurations are rejected before any
//! background work or filesystem mutation starts.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn folder_mirror() -> Command {
    Command::cargo_bin("folder-mirror").expect("binary builds")
}

#[test]
fn rejects_nested_roots() {
    let temp = tempfile::tempdir().expect("tempdir");
    let source = temp.path().join("source");
    let replica = source.join("replica");
    fs::create_dir_all(&replica).expect("create nested roots");
    let log = temp.path().join("mirror.log");

    folder_mirror()
        .arg(&source)
        .arg(&replica)
        .arg(&log)
        .arg("5")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("nested"));
}

#[test]
fn rejects_missing_source() {
    let temp = tempfile::tempdir().expect("tempdir");
    let replica = temp.path().join("replica");
    fs::create_dir(&replica).expect("create replica");
    let log = temp.path().join("mirror.log");

    folder_mirror()
        .arg(temp.path().join("absent"))
        .arg(&replica)
        .arg(&log)
        .arg("5")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("source root"));
}

#[test]
fn rejects_source_that_is_a_file() {
    let temp = tempfile::tempdir().expect("tempdir");
    let source = temp.path().join("source.txt");
    let replica = temp.path().join("replica");
    fs::write(&source, b"not a directory").expect("write");
    fs::create_dir(&replica).expect("create replica");
    let log = temp.path().join("mirror.log");

    folder_mirror()
        .arg(&source)
        .arg(&replica)
        .arg(&log)
        .arg("5")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("source root"));
}

#[test]
fn rejects_zero_interval_and_mutates_nothing() {
    let temp = tempfile::tempdir().expect("tempdir");
    let source = temp.path().join("source");
    let replica = temp.path().join("replica");
    fs::create_dir(&source).expect("create source");
    fs::create_dir(&replica).expect("create replica");
    fs::write(source.join("file.txt"), b"data").expect("write");
    let log = temp.path().join("mirror.log");

    folder_mirror()
        .arg(&source)
        .arg(&replica)
        .arg(&log)
        .arg("0")
        .assert()
        .failure()
        .code(2);

    assert!(
        fs::read_dir(&replica).expect("read replica").next().is_none(),
        "replica must stay untouched"
    );
}

#[test]
fn rejects_unwritable_log_destination() {
    let temp = tempfile::tempdir().expect("tempdir");
    let source = temp.path().join("source");
    let replica = temp.path().join("replica");
    fs::create_dir(&source).expect("create source");
    fs::create_dir(&replica).expect("create replica");

    folder_mirror()
        .arg(&source)
        .arg(&replica)
        .arg(temp.path().join("missing-dir/mirror.log"))
        .arg("5")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("log destination"));
}

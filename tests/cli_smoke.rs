//! Smoke tests for the irr binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

/// Write a minimal two-rater fixture and return (rater1, rater2, labels).
fn fixture(root: &Path) -> (std::path::PathBuf, std::path::PathBuf, std::path::PathBuf) {
    let rater1 = root.join("rater1");
    let rater2 = root.join("rater2");
    fs::create_dir_all(&rater1).unwrap();
    fs::create_dir_all(&rater2).unwrap();
    fs::write(
        rater1.join("export.csv"),
        "Data,Label\nx,bug\ny,feature\nz,bug\n",
    )
    .unwrap();
    fs::write(
        rater2.join("export.csv"),
        "Data,Label\nx,bug\ny,feature\nz,feature\n",
    )
    .unwrap();
    let labels = root.join("labels.txt");
    fs::write(&labels, "bug, feature").unwrap();
    (rater1, rater2, labels)
}

fn irr() -> Command {
    Command::cargo_bin("irr").unwrap()
}

#[test]
fn test_compute_prints_alpha_and_interpretation() {
    let root = tempfile::tempdir().unwrap();
    let (rater1, rater2, labels) = fixture(root.path());

    irr()
        .args(["compute", "--rater1"])
        .arg(&rater1)
        .arg("--rater2")
        .arg(&rater2)
        .arg("--labels")
        .arg(&labels)
        .assert()
        .success()
        .stdout(predicate::str::contains("alpha:"))
        .stdout(predicate::str::contains("disagreements: 1"));
}

#[test]
fn test_compute_json_is_parseable() {
    let root = tempfile::tempdir().unwrap();
    let (rater1, rater2, labels) = fixture(root.path());

    let output = irr()
        .args(["compute", "--json", "--rater1"])
        .arg(&rater1)
        .arg("--rater2")
        .arg(&rater2)
        .arg("--labels")
        .arg(&labels)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert!(parsed["report"]["alpha"].is_number());
    assert!(parsed["diagnostics"]["disagreements"].is_array());
}

#[test]
fn test_table_writes_reconciled_csv() {
    let root = tempfile::tempdir().unwrap();
    let (rater1, rater2, labels) = fixture(root.path());
    let out = root.path().join("table.csv");

    irr()
        .args(["table", "--rater1"])
        .arg(&rater1)
        .arg("--rater2")
        .arg(&rater2)
        .arg("--labels")
        .arg(&labels)
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    let table = fs::read_to_string(&out).unwrap();
    assert!(table.starts_with("data,bug,feature,num_raters"));
    assert!(table.contains("x,2,0,2"));
    assert!(table.contains("z,1,1,2"));
}

#[test]
fn test_unknown_label_fails_with_named_token() {
    let root = tempfile::tempdir().unwrap();
    let (rater1, rater2, labels) = fixture(root.path());
    fs::write(
        root.path().join("rater1").join("typo.csv"),
        "Data,Label\nw,bgu\n",
    )
    .unwrap();

    irr()
        .args(["compute", "--rater1"])
        .arg(&rater1)
        .arg("--rater2")
        .arg(&rater2)
        .arg("--labels")
        .arg(&labels)
        .assert()
        .failure()
        .stderr(predicate::str::contains("bgu"));
}

#[test]
fn test_missing_labels_file_fails() {
    let root = tempfile::tempdir().unwrap();
    let (rater1, rater2, _) = fixture(root.path());

    irr()
        .args(["compute", "--rater1"])
        .arg(&rater1)
        .arg("--rater2")
        .arg(&rater2)
        .arg("--labels")
        .arg(root.path().join("nope.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

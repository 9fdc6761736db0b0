/*!
 * Command-line tests for allcode
 */

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn allcode() -> Command {
    Command::new(env!("CARGO_BIN_EXE_allcode"))
}

#[test]
fn shows_help() {
    allcode()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--include-ext"));
}

#[test]
fn exports_project_and_prints_locations() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join("a.py"), "print(1)").unwrap();
    fs::create_dir(temp_dir.path().join("sub")).unwrap();
    fs::write(temp_dir.path().join("sub").join("b.ini"), "[x]\nk=1").unwrap();

    allcode()
        .arg(temp_dir.path())
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("ALL_CODE.txt"))
        .stdout(predicate::str::contains("ALL_CODE_MANIFEST.json"));

    let manifest: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(temp_dir.path().join("ALL_CODE_MANIFEST.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(manifest["file_count"], 2);
    assert_eq!(manifest["files"][0]["path"], "a.py");
    assert_eq!(manifest["files"][1]["path"], "sub/b.ini");
    assert_eq!(
        manifest["files"][0]["sha256"].as_str().map(str::len),
        Some(64)
    );
}

#[test]
fn custom_extensions_and_output_names() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join("lib.rs"), "fn main() {}").unwrap();
    fs::write(temp_dir.path().join("a.py"), "print(1)").unwrap();

    allcode()
        .arg(temp_dir.path())
        .args(["--include-ext", "rs", "--no-optional"])
        .args(["--output-txt", "dump.txt", "--output-manifest", "dump.json"])
        .arg("--quiet")
        .assert()
        .success();

    let text = fs::read_to_string(temp_dir.path().join("dump.txt")).unwrap();
    assert!(text.contains("# FILE: lib.rs"));
    assert!(!text.contains("# FILE: a.py"));
    assert!(temp_dir.path().join("dump.json").exists());
}

#[test]
fn missing_root_exits_with_error() {
    let temp_dir = tempdir().unwrap();

    allcode()
        .arg(temp_dir.path().join("nope"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn empty_selection_exits_with_error() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join("image.png"), [0x89, b'P', b'N', b'G']).unwrap();

    allcode()
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No exportable files"));

    assert!(!temp_dir.path().join("ALL_CODE.txt").exists());
}

//! Integration tests for dirpack-cli.
//!
//! Note: Tests use `unwrap`/`expect` which is acceptable in test code.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::fs::File;
use std::path::Path;
use std::path::PathBuf;
use tempfile::TempDir;

fn dirpack_cmd() -> Command {
    cargo_bin_cmd!("dirpack")
}

/// Creates `source/` with a small project tree inside `temp`.
fn sample_source(temp: &TempDir) -> PathBuf {
    let source = temp.path().join("source");
    for (relative, content) in [
        ("a.txt", "hello"),
        ("sub/b.txt", "world"),
        ("build/output.tmp", "tmp"),
        (".git/HEAD", "ref: refs/heads/main"),
    ] {
        let path = source.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    source
}

fn archive_names(path: &Path) -> Vec<String> {
    let mut zip = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    (0..zip.len())
        .map(|idx| zip.by_index(idx).unwrap().name().to_string())
        .collect()
}

#[test]
fn test_version_flag() {
    dirpack_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("dirpack"));
}

#[test]
fn test_help_flag() {
    dirpack_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Deterministic ZIP packaging"));
}

#[test]
fn test_create_help() {
    dirpack_cmd()
        .arg("create")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Package a directory into a ZIP archive"));
}

#[test]
fn test_create_archive() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = sample_source(&temp);
    let output = temp.path().join("out.zip");

    dirpack_cmd()
        .arg("create")
        .arg(&source)
        .arg(&output)
        .args(["-x", "build/*", "--reproducible"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Archive created"))
        .stderr(predicate::str::contains(
            "[ZIP archive] archiving into root directory",
        ));

    assert_eq!(archive_names(&output), vec!["a.txt", "sub/b.txt"]);
}

#[test]
fn test_create_with_subdirectory() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = sample_source(&temp);
    let output = temp.path().join("out.zip");

    dirpack_cmd()
        .arg("create")
        .arg(&source)
        .arg(&output)
        .args(["--subdirectory", "dist", "-x", "build", "--reproducible"])
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "[ZIP archive] archiving into subdirectory dist",
        ));

    assert_eq!(archive_names(&output), vec!["dist/a.txt", "dist/sub/b.txt"]);
}

#[test]
fn test_create_reproducible_is_byte_identical() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = sample_source(&temp);
    let first = temp.path().join("first.zip");
    let second = temp.path().join("second.zip");

    for output in [&first, &second] {
        dirpack_cmd()
            .arg("create")
            .arg(&source)
            .arg(output)
            .args(["--reproducible", "--archive-only-mtime"])
            .assert()
            .success();
    }

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn test_create_refuses_to_overwrite() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = sample_source(&temp);
    let output = temp.path().join("out.zip");
    fs::write(&output, "existing").unwrap();

    dirpack_cmd()
        .arg("create")
        .arg(&source)
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"))
        .stderr(predicate::str::contains("--force"));

    assert_eq!(fs::read_to_string(&output).unwrap(), "existing");
}

#[test]
fn test_create_force_overwrites() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = sample_source(&temp);
    let output = temp.path().join("out.zip");
    fs::write(&output, "existing").unwrap();

    dirpack_cmd()
        .arg("create")
        .arg(&source)
        .arg(&output)
        .arg("--force")
        .assert()
        .success();

    assert!(archive_names(&output).contains(&"a.txt".to_string()));
}

#[test]
fn test_create_verbose_lists_files() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = sample_source(&temp);
    let output = temp.path().join("out.zip");

    dirpack_cmd()
        .arg("--verbose")
        .arg("create")
        .arg(&source)
        .arg(&output)
        .assert()
        .success()
        .stderr(predicate::str::contains("creating ZIP file"))
        .stderr(predicate::str::contains("as sub/b.txt"))
        .stderr(predicate::str::contains("done (3 files)"));
}

#[test]
fn test_create_quiet_is_silent() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = sample_source(&temp);
    let output = temp.path().join("out.zip");

    dirpack_cmd()
        .arg("--quiet")
        .arg("create")
        .arg(&source)
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());

    assert!(output.exists());
}

#[test]
fn test_create_json_output() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = sample_source(&temp);
    let output = temp.path().join("out.zip");

    let stdout = dirpack_cmd()
        .arg("--json")
        .arg("create")
        .arg(&source)
        .arg(&output)
        .args(["-x", "build/*", "--reproducible"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&stdout).expect("invalid JSON output");
    assert_eq!(json["status"], "success");
    assert_eq!(json["operation"], "create");
    assert_eq!(json["data"]["files_added"], 2);
    assert_eq!(json["data"]["entries"][0], "a.txt");
    assert_eq!(json["data"]["entries"][1], "sub/b.txt");
}

#[test]
fn test_create_json_error() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let output = temp.path().join("out.zip");

    let stdout = dirpack_cmd()
        .arg("--json")
        .arg("create")
        .arg(temp.path().join("missing"))
        .arg(&output)
        .assert()
        .failure()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&stdout).expect("invalid JSON output");
    assert_eq!(json["status"], "error");
    assert_eq!(json["operation"], "create");
    assert!(!output.exists());
}

#[test]
fn test_create_missing_source() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let output = temp.path().join("out.zip");

    dirpack_cmd()
        .arg("create")
        .arg(temp.path().join("missing"))
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot read source tree"))
        .stderr(predicate::str::contains("HINT"));

    assert!(!output.exists());
}

#[test]
fn test_create_bad_destination() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = sample_source(&temp);
    let output = temp.path().join("no/such/dir/out.zip");

    dirpack_cmd()
        .arg("create")
        .arg(&source)
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot create archive"));

    assert!(!output.exists());
}

#[test]
fn test_create_invalid_pattern() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = sample_source(&temp);
    let output = temp.path().join("out.zip");

    dirpack_cmd()
        .arg("create")
        .arg(&source)
        .arg(&output)
        .args(["-x", "src/["])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid ignore pattern"));

    assert!(!output.exists());
}

#[test]
fn test_create_invalid_subdirectory() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = sample_source(&temp);
    let output = temp.path().join("out.zip");

    dirpack_cmd()
        .arg("create")
        .arg(&source)
        .arg(&output)
        .args(["--subdirectory", "../escape"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid subdirectory"));

    assert!(!output.exists());
}

#[test]
fn test_create_with_config_file() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = sample_source(&temp);
    let output = temp.path().join("out.zip");
    let config = temp.path().join("dirpack.json");
    fs::write(
        &config,
        r#"{"subdirectory": "pkg", "ignore": ["build"], "reproducible": true}"#,
    )
    .unwrap();

    dirpack_cmd()
        .arg("create")
        .arg(&source)
        .arg(&output)
        .arg("--config")
        .arg(&config)
        .args(["-x", "sub"])
        .assert()
        .success();

    assert_eq!(archive_names(&output), vec!["pkg/a.txt"]);
}

#[test]
fn test_create_invalid_config_file() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = sample_source(&temp);
    let config = temp.path().join("dirpack.json");
    fs::write(&config, r#"{"unknown": 1}"#).unwrap();

    dirpack_cmd()
        .arg("create")
        .arg(&source)
        .arg(temp.path().join("out.zip"))
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config file"));
}

#[test]
fn test_plan_lists_sorted_entries() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = sample_source(&temp);

    dirpack_cmd()
        .arg("plan")
        .arg(&source)
        .args(["--reproducible", "--subdirectory", "dist"])
        .assert()
        .success()
        .stdout("dist/a.txt\ndist/build/output.tmp\ndist/sub/b.txt\n");

    // plan never writes or touches anything
    assert!(!temp.path().join("dist").exists());
}

#[test]
fn test_plan_json_output() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = sample_source(&temp);

    let stdout = dirpack_cmd()
        .arg("--json")
        .arg("plan")
        .arg(&source)
        .args(["-x", "build", "--reproducible"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&stdout).expect("invalid JSON output");
    assert_eq!(json["operation"], "plan");
    assert_eq!(json["data"]["count"], 2);
    assert_eq!(json["data"]["entries"][1]["archive_path"], "sub/b.txt");
}

#[test]
fn test_completion_bash() {
    dirpack_cmd()
        .arg("completion")
        .arg("bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("dirpack"));
}

//! Integration tests for the tp binary
//!
//! Each test runs the CLI inside its own temp directory with HOME and the
//! config dir redirected so no user configuration leaks in.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn tp(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tp").expect("tp binary should build");
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("TP_VERSION")
        .env_remove("RUST_LOG");
    cmd
}

fn setup_template(dir: &TempDir) {
    fs::create_dir_all(dir.path().join("src")).unwrap();
    fs::write(
        dir.path().join("src").join("init.gradle"),
        "version=<<version>>\nother=<<version>>-x",
    )
    .unwrap();
}

// =============================================================================
// promote
// =============================================================================

#[test]
fn test_promote_with_explicit_version() {
    let temp = TempDir::new().unwrap();
    setup_template(&temp);

    tp(temp.path())
        .args(["promote", "src/init.gradle", "--project-version", "1.2.3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Promoted"))
        .stdout(predicate::str::contains("2 replacements"));

    let out = fs::read_to_string(temp.path().join("reference").join("init.gradle")).unwrap();
    assert_eq!(out, "version=1.2.3\nother=1.2.3-x");
}

#[test]
fn test_promote_reads_gradle_properties() {
    let temp = TempDir::new().unwrap();
    setup_template(&temp);
    fs::write(temp.path().join("gradle.properties"), "version=4.0.0\n").unwrap();

    tp(temp.path())
        .args(["promote", "src/init.gradle", "--into", "out"])
        .assert()
        .success();

    let out = fs::read_to_string(temp.path().join("out").join("init.gradle")).unwrap();
    assert_eq!(out, "version=4.0.0\nother=4.0.0-x");
}

#[test]
fn test_promote_env_overrides_properties() {
    let temp = TempDir::new().unwrap();
    setup_template(&temp);
    fs::write(temp.path().join("gradle.properties"), "version=4.0.0\n").unwrap();

    tp(temp.path())
        .env("TP_VERSION", "5.0.0")
        .args(["promote", "src/init.gradle"])
        .assert()
        .success();

    let out = fs::read_to_string(temp.path().join("reference").join("init.gradle")).unwrap();
    assert!(out.starts_with("version=5.0.0"));
}

#[test]
fn test_promote_uses_config_file() {
    let temp = TempDir::new().unwrap();
    setup_template(&temp);
    fs::write(
        temp.path().join(".promote.yml"),
        "promotion:\n  source: src/init.gradle\n  into: promoted\n  version: \"9.9\"\n",
    )
    .unwrap();

    tp(temp.path()).arg("promote").assert().success();

    let out = fs::read_to_string(temp.path().join("promoted").join("init.gradle")).unwrap();
    assert_eq!(out, "version=9.9\nother=9.9-x");
}

#[test]
fn test_promote_missing_source_fails() {
    let temp = TempDir::new().unwrap();

    tp(temp.path())
        .args(["promote", "nope.gradle", "-p", "1.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Source file not found"));

    assert!(!temp.path().join("reference").exists());
}

#[test]
fn test_promote_without_version_fails() {
    let temp = TempDir::new().unwrap();
    setup_template(&temp);

    tp(temp.path())
        .args(["promote", "src/init.gradle"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No project version found"));
}

#[test]
fn test_promote_empty_version_fails() {
    let temp = TempDir::new().unwrap();
    setup_template(&temp);

    tp(temp.path())
        .args(["promote", "src/init.gradle", "-p", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty"));
}

#[test]
fn test_promote_without_source_fails() {
    let temp = TempDir::new().unwrap();

    tp(temp.path())
        .args(["promote", "-p", "1.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No template given"));
}

// =============================================================================
// render / check
// =============================================================================

#[test]
fn test_render_prints_without_writing() {
    let temp = TempDir::new().unwrap();
    setup_template(&temp);

    tp(temp.path())
        .args(["render", "src/init.gradle", "-p", "1.2.3"])
        .assert()
        .success()
        .stdout(predicate::eq("version=1.2.3\nother=1.2.3-x"));

    assert!(!temp.path().join("reference").exists());
}

#[test]
fn test_check_detects_stale_output() {
    let temp = TempDir::new().unwrap();
    setup_template(&temp);

    tp(temp.path())
        .args(["check", "src/init.gradle", "-p", "1.0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing"));

    tp(temp.path())
        .args(["promote", "src/init.gradle", "-p", "1.0"])
        .assert()
        .success();

    tp(temp.path())
        .args(["check", "src/init.gradle", "-p", "1.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("up to date"));

    tp(temp.path())
        .args(["check", "src/init.gradle", "-p", "1.1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("stale"));
}

// =============================================================================
// publish / resolve
// =============================================================================

#[test]
fn test_publish_then_resolve() {
    let temp = TempDir::new().unwrap();
    setup_template(&temp);

    tp(temp.path())
        .args([
            "publish",
            "src/init.gradle",
            "-p",
            "1.0",
            "--category",
            "develocity-injection-script",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("develocity-injection-script"));

    assert!(temp.path().join("build").join("artifacts.json").exists());

    tp(temp.path())
        .args(["resolve", "develocity-injection-script"])
        .assert()
        .success()
        .stdout(predicate::str::contains("init.gradle"));
}

#[test]
fn test_resolve_from_another_directory() {
    let temp = TempDir::new().unwrap();
    let producer = temp.path().join("producer");
    let consumer = temp.path().join("consumer");
    fs::create_dir_all(producer.join("src")).unwrap();
    fs::create_dir_all(&consumer).unwrap();
    fs::write(producer.join("src").join("init.gradle"), "v=<<version>>").unwrap();

    tp(&producer)
        .args(["publish", "src/init.gradle", "-p", "1.0"])
        .assert()
        .success();

    let manifest = producer.join("build").join("artifacts.json");
    let expected = fs::canonicalize(producer.join("reference").join("init.gradle")).unwrap();

    tp(&consumer)
        .args(["resolve", "promoted-template", "--manifest"])
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains(expected.display().to_string()));
}

#[test]
fn test_resolve_unknown_category_fails() {
    let temp = TempDir::new().unwrap();

    tp(temp.path())
        .args(["resolve", "unknown"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No artifact published for category 'unknown'"));
}

#[test]
fn test_resolve_modified_artifact_fails() {
    let temp = TempDir::new().unwrap();
    setup_template(&temp);

    tp(temp.path())
        .args(["publish", "src/init.gradle", "-p", "1.0", "-m", "m.json"])
        .assert()
        .success();

    fs::write(temp.path().join("reference").join("init.gradle"), "edited by hand").unwrap();

    tp(temp.path())
        .args(["resolve", "promoted-template", "-m", "m.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("modified"));
}

//! Tests for error presentation and exit codes.

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

fn project(manifest: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("buildtree.toml"), manifest).unwrap();
    fs::create_dir_all(dir.path().join("src/first")).unwrap();
    fs::write(dir.path().join("src/first/__main__.py"), "print('hi')\n").unwrap();
    fs::create_dir_all(dir.path().join("templates/tester-dummy")).unwrap();
    fs::write(dir.path().join("templates/tester-dummy/new"), "new\n").unwrap();
    dir
}

const ONE_APP: &str = r#"
[project]
bundle = "com.example"

[apps.first]
sources = ["src/first"]
"#;

#[test]
fn missing_manifest_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    cargo_bin_cmd!("buildtree")
        .current_dir(dir.path())
        .arg("list")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("No buildtree.toml found"))
        .stderr(predicate::str::contains("--project"));
}

#[test]
fn unknown_app_lists_the_available_ones() {
    let dir = project(ONE_APP);
    cargo_bin_cmd!("buildtree")
        .current_dir(dir.path())
        .args(["create", "tester", "dummy", "--app", "third"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no app named 'third'"))
        .stderr(predicate::str::contains("available: first"));
}

#[test]
fn malformed_manifest_is_a_user_error() {
    let dir = project("[apps.first\n");
    cargo_bin_cmd!("buildtree")
        .current_dir(dir.path())
        .arg("list")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid project manifest"));
}

#[test]
fn unsupported_target_touches_nothing() {
    let dir = project(
        r#"
[project]
bundle = "com.example"

[apps.first]
sources = ["src/first"]

[apps.first.tester.dummy]
supported = false
"#,
    );
    cargo_bin_cmd!("buildtree")
        .current_dir(dir.path())
        .args(["create", "tester", "dummy"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not supported on tester dummy"));

    assert!(!dir.path().join("build").exists());
}

#[test]
fn invalid_platform_name_is_rejected() {
    let dir = project(ONE_APP);
    cargo_bin_cmd!("buildtree")
        .current_dir(dir.path())
        .args(["create", "../etc", "dummy"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid build target"));
}

#[test]
fn missing_template_is_reported() {
    let dir = project(ONE_APP);
    cargo_bin_cmd!("buildtree")
        .current_dir(dir.path())
        .args(["create", "linux", "system"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unable to generate the first template"));
}

#[test]
fn missing_source_names_the_failed_step() {
    let dir = project(
        r#"
[project]
bundle = "com.example"

[apps.first]
sources = ["src/missing"]
"#,
    );
    cargo_bin_cmd!("buildtree")
        .current_dir(dir.path())
        .args(["create", "tester", "dummy"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Step 'code' failed for first"))
        .stderr(predicate::str::contains("The 'code' step failed"));
}

#[test]
fn verbose_shows_the_cause_chain() {
    let dir = project(
        r#"
[project]
bundle = "com.example"

[apps.first]
sources = ["src/missing"]
"#,
    );
    cargo_bin_cmd!("buildtree")
        .current_dir(dir.path())
        .env_remove("RUST_LOG")
        .args(["-v", "create", "tester", "dummy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Caused by:"))
        .stderr(predicate::str::contains("--verbose").not());
}

#[test]
fn missing_config_file_is_a_configuration_error() {
    let dir = project(ONE_APP);
    cargo_bin_cmd!("buildtree")
        .current_dir(dir.path())
        .args(["--config", "absent.toml", "list"])
        .assert()
        .code(4);
}

#[test]
fn quiet_and_verbose_conflict() {
    cargo_bin_cmd!("buildtree")
        .args(["--quiet", "--verbose", "list"])
        .assert()
        .code(2);
}

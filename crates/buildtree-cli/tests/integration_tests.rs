//! Integration tests for the buildtree binary.

use std::{
    fs,
    path::{Path, PathBuf},
};

use assert_cmd::{Command, cargo::cargo_bin_cmd};
use predicates::prelude::*;
use tempfile::TempDir;

const MANIFEST: &str = r#"
[project]
name = "Hello Project"
bundle = "com.example"
version = "0.0.1"

[apps.first]
formal_name = "First App"
description = "The first simple app"
sources = ["src/first"]

[apps.second]
sources = ["src/second"]
"#;

/// A project with two apps, a tester-dummy template and an empty cache.
struct Project {
    dir: TempDir,
}

impl Project {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        fs::write(root.join("buildtree.toml"), MANIFEST).unwrap();
        for app in ["first", "second"] {
            fs::create_dir_all(root.join("src").join(app)).unwrap();
            fs::write(root.join("src").join(app).join("__main__.py"), "print('hi')\n").unwrap();
        }
        fs::create_dir_all(root.join("templates/tester-dummy")).unwrap();
        fs::write(
            root.join("templates/tester-dummy/new"),
            "{{ formal_name }} {{ version }}\n",
        )
        .unwrap();
        fs::create_dir_all(root.join("cache")).unwrap();

        Self { dir }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn bundle(&self, app: &str) -> PathBuf {
        self.root().join("build").join(app).join("tester/dummy")
    }

    /// `buildtree` run inside the project with an isolated environment.
    fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("buildtree");
        cmd.current_dir(self.root())
            .env_remove("RUST_LOG")
            .env("BUILDTREE_CACHE_DIR", self.root().join("cache"))
            .env("NO_COLOR", "1");
        cmd
    }
}

#[test]
fn help_lists_the_commands() {
    cargo_bin_cmd!("buildtree")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn version_flag() {
    cargo_bin_cmd!("buildtree")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn create_help_shows_options() {
    cargo_bin_cmd!("buildtree")
        .args(["create", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--app"))
        .stdout(predicate::str::contains("--project"))
        .stdout(predicate::str::contains("--no-input"));
}

#[test]
fn list_shows_every_app() {
    let project = Project::new();
    project
        .cmd()
        .args(["list", "--format", "list"])
        .assert()
        .success()
        .stdout("first\nsecond\n");
}

#[test]
fn list_as_json() {
    let project = Project::new();
    let output = project
        .cmd()
        .args(["list", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let apps: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(apps[0]["name"], "first");
    assert_eq!(apps[0]["formal_name"], "First App");
    assert_eq!(apps[1]["bundle_identifier"], "com.example.second");
}

#[test]
fn list_from_another_directory() {
    let project = Project::new();
    let elsewhere = tempfile::tempdir().unwrap();
    cargo_bin_cmd!("buildtree")
        .current_dir(elsewhere.path())
        .arg("list")
        .arg("--project")
        .arg(project.root())
        .assert()
        .success()
        .stdout(predicate::str::contains("Hello Project"));
}

#[test]
fn create_builds_every_app() {
    let project = Project::new();
    project
        .cmd()
        .args(["create", "tester", "dummy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created build/first/tester/dummy"))
        .stdout(predicate::str::contains("Created build/second/tester/dummy"));

    let first = project.bundle("first");
    assert_eq!(
        fs::read_to_string(first.join("new")).unwrap(),
        "First App 0.0.1\n"
    );
    assert!(first.join("app/first/__main__.py").is_file());
    assert!(project.bundle("second").join("app/second/__main__.py").is_file());
}

#[test]
fn create_a_single_app() {
    let project = Project::new();
    project
        .cmd()
        .args(["create", "tester", "dummy", "--app", "second"])
        .assert()
        .success();

    assert!(project.bundle("second").exists());
    assert!(!project.bundle("first").exists());
}

#[test]
fn existing_bundle_is_kept_without_input() {
    let project = Project::new();
    project
        .cmd()
        .args(["create", "tester", "dummy", "-a", "first"])
        .assert()
        .success();
    fs::write(project.bundle("first").join("marker"), "keep me").unwrap();

    project
        .cmd()
        .args(["create", "tester", "dummy", "-a", "first", "--no-input"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Kept existing build/first/tester/dummy"));

    assert_eq!(
        fs::read_to_string(project.bundle("first").join("marker")).unwrap(),
        "keep me"
    );
}

#[test]
fn global_flags_work_before_the_subcommand() {
    let project = Project::new();
    project
        .cmd()
        .args(["create", "tester", "dummy", "-a", "first"])
        .assert()
        .success();
    fs::write(project.bundle("first").join("marker"), "keep me").unwrap();

    let elsewhere = tempfile::tempdir().unwrap();
    cargo_bin_cmd!("buildtree")
        .current_dir(elsewhere.path())
        .env("BUILDTREE_CACHE_DIR", project.root().join("cache"))
        .env("NO_COLOR", "1")
        .arg("--no-input")
        .arg("--project")
        .arg(project.root())
        .args(["create", "tester", "dummy", "-a", "first"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Kept existing build/first/tester/dummy"));

    assert!(project.bundle("first").join("marker").is_file());
}

#[test]
fn no_input_setting_keeps_existing_bundles() {
    let project = Project::new();
    project
        .cmd()
        .args(["create", "tester", "dummy", "-a", "second"])
        .assert()
        .success();

    project
        .cmd()
        .env("BUILDTREE_NO_INPUT", "true")
        .args(["create", "tester", "dummy", "-a", "second"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Kept existing build/second/tester/dummy"));
}

#[test]
fn create_reports_steps_as_json() {
    let project = Project::new();
    let output = project
        .cmd()
        .args(["--output-format", "json", "create", "tester", "dummy", "-a", "first"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let report = &reports[0];
    assert_eq!(report["app"], "first");
    assert_eq!(report["decision"], "absent");

    let steps: Vec<&str> = report["steps"]
        .as_array()
        .unwrap()
        .iter()
        .map(|step| step["step"].as_str().unwrap())
        .collect();
    assert_eq!(
        steps,
        [
            "generate",
            "support",
            "verify-app-template",
            "verify-app-tools",
            "code",
            "requirements",
            "resources",
            "cleanup",
        ]
    );
}

#[test]
fn build_dir_comes_from_settings() {
    let project = Project::new();
    project
        .cmd()
        .env("BUILDTREE_BUILD_DIR", "out")
        .args(["create", "tester", "dummy", "-a", "first"])
        .assert()
        .success();

    assert!(project.root().join("out/first/tester/dummy/new").is_file());
}

#[test]
fn config_path_prints_a_toml_file() {
    cargo_bin_cmd!("buildtree")
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("toml"));
}

#[test]
fn config_list_reflects_the_file() {
    let project = Project::new();
    let config = project.root().join("settings.toml");
    fs::write(&config, "template_dir = \"platform-templates\"\n").unwrap();

    project
        .cmd()
        .arg("--config")
        .arg(&config)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("platform-templates"));
}

#[test]
fn completions_for_bash() {
    cargo_bin_cmd!("buildtree")
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("buildtree"));
}

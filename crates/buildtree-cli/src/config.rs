//! CLI settings.
//!
//! [`Settings`] is loaded once at startup and passed down by value.  The
//! CLI layer owns settings; the core crate never sees them.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `BUILDTREE_*` environment variables (`BUILDTREE_BUILD_DIR`,
//!    `BUILDTREE_TOOLS__LINUX`, ...)
//! 3. Config file: `--config FILE`, else [`Settings::config_path`]
//! 4. Built-in defaults (always present)

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "BUILDTREE";

/// Resolved CLI settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Build output directory, relative to the project root.
    pub build_dir: PathBuf,
    /// Directory holding `<platform>-<format>` templates, relative to the
    /// project root unless absolute.
    pub template_dir: PathBuf,
    /// Asset cache holding support packages and stub binaries.
    pub cache_dir: PathBuf,
    /// Never prompt.
    pub no_input: bool,
    /// Tools that must be on `PATH`, per platform.
    pub tools: BTreeMap<String, Vec<String>>,
    /// Requirement installer command; empty uses the built-in default.
    pub installer: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            build_dir: PathBuf::from(buildtree_core::domain::DEFAULT_BUILD_DIR),
            template_dir: PathBuf::from("templates"),
            cache_dir: default_cache_dir(),
            no_input: false,
            tools: BTreeMap::new(),
            installer: Vec::new(),
        }
    }
}

impl Settings {
    /// Load settings from defaults, the config file and the environment.
    ///
    /// An explicit `config_file` must exist; the default location is
    /// optional.
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        let file = match config_file {
            Some(path) => File::from(path).format(FileFormat::Toml).required(true),
            None => File::from(Self::config_path().as_path())
                .format(FileFormat::Toml)
                .required(false),
        };

        Config::builder()
            .add_source(
                Config::try_from(&Self::default()).context("failed to encode default settings")?,
            )
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(" ")
                    .with_list_parse_key("installer")
                    .try_parsing(true),
            )
            .build()
            .context("failed to read settings")?
            .try_deserialize()
            .context("invalid settings")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.buildtree.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "buildtree", "buildtree")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".buildtree.toml"))
    }

    /// Template directory for `project_root`.
    pub fn template_dir_in(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.template_dir)
    }

    /// Asset cache directory for `project_root`.
    pub fn cache_dir_in(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.cache_dir)
    }
}

fn default_cache_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "buildtree", "buildtree")
        .map(|d| d.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".buildtree/cache"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_project_relative() {
        let settings = Settings::default();
        assert_eq!(settings.build_dir, PathBuf::from("build"));
        assert_eq!(settings.template_dir, PathBuf::from("templates"));
        assert!(!settings.no_input);
        assert!(settings.installer.is_empty());
    }

    #[test]
    fn explicit_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(
            &path,
            r#"
build_dir = "out"
no_input = true
installer = ["uv", "pip", "install", "--target"]

[tools]
linux = ["strip"]
"#,
        )
        .unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.build_dir, PathBuf::from("out"));
        assert!(settings.no_input);
        assert_eq!(settings.installer[0], "uv");
        assert_eq!(settings.tools["linux"], ["strip"]);
        assert_eq!(settings.template_dir, PathBuf::from("templates"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Settings::load(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn absolute_dirs_ignore_the_project_root() {
        let settings = Settings {
            cache_dir: PathBuf::from("/var/cache/buildtree"),
            ..Settings::default()
        };
        assert_eq!(
            settings.cache_dir_in(Path::new("/projects/hello")),
            PathBuf::from("/var/cache/buildtree")
        );
        assert_eq!(
            settings.template_dir_in(Path::new("/projects/hello")),
            PathBuf::from("/projects/hello/templates")
        );
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!Settings::config_path().as_os_str().is_empty());
    }
}

//! Build targets and the on-disk layout of generated bundles.
//!
//! A [`BuildTarget`] names *where* an app is being built for: a platform
//! (`linux`, `macOS`, `windows`, ...) and an output format of that platform
//! (`system`, `app`, `appimage`, ...). Together with a [`ProjectLayout`] it
//! resolves the bundle path:
//!
//! ```text
//! <base_path>/<build_dir>/<app_name>/<platform>/<output_format>
//! ```
//!
//! The function is pure: the same inputs always give the same path, and two
//! different (app, platform, format) triples never share one.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::{
    entities::app::AppConfig, error::DomainError, value_objects::ExecutableNaming,
};

/// Default name of the build directory below the project root.
pub const DEFAULT_BUILD_DIR: &str = "build";

/// A validated (platform, output format) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BuildTarget {
    platform: String,
    output_format: String,
}

impl BuildTarget {
    pub fn new(
        platform: impl Into<String>,
        output_format: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let platform = platform.into();
        let output_format = output_format.into();
        validate_identifier(&platform)?;
        validate_identifier(&output_format)?;
        Ok(Self {
            platform,
            output_format,
        })
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn output_format(&self) -> &str {
        &self.output_format
    }

    /// Executable naming convention of the platform family.
    pub fn executable_naming(&self) -> ExecutableNaming {
        if self.platform.eq_ignore_ascii_case("windows") {
            ExecutableNaming::Exe
        } else {
            ExecutableNaming::Bare
        }
    }

    /// File name of the app's stub executable on this target.
    pub fn exe_name(&self, app: &AppConfig) -> String {
        self.executable_naming().file_name(app.app_name())
    }

    /// Location of the stub executable inside a bundle.
    pub fn binary_path(&self, bundle_path: &Path, app: &AppConfig) -> PathBuf {
        bundle_path.join(self.exe_name(app))
    }
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.platform, self.output_format)
    }
}

fn validate_identifier(value: &str) -> Result<(), DomainError> {
    let invalid = |reason: &str| DomainError::InvalidTarget {
        value: value.into(),
        reason: reason.into(),
    };

    if value.is_empty() {
        return Err(invalid("identifier cannot be empty"));
    }
    if value == "." || value == ".." {
        return Err(invalid("identifier cannot be a relative path marker"));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(invalid(
            "identifier may only contain letters, digits, '-', '_' and '.'",
        ));
    }
    Ok(())
}

/// Where a project lives and where its build trees go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    base_path: PathBuf,
    build_dir: PathBuf,
}

impl ProjectLayout {
    /// Layout rooted at `base_path` with the default `build` directory.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            build_dir: PathBuf::from(DEFAULT_BUILD_DIR),
        }
    }

    /// Use a different build directory (relative paths resolve against the
    /// project root).
    pub fn with_build_dir(mut self, build_dir: impl Into<PathBuf>) -> Self {
        self.build_dir = build_dir.into();
        self
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Absolute (or base-relative) build output directory.
    pub fn build_path(&self) -> PathBuf {
        self.base_path.join(&self.build_dir)
    }

    /// Bundle path for one app on one target.
    pub fn bundle_path(&self, app: &AppConfig, target: &BuildTarget) -> PathBuf {
        self.build_path()
            .join(app.app_name())
            .join(target.platform())
            .join(target.output_format())
    }

    /// `path` relative to the project root, for display. Paths outside the
    /// project are returned unchanged.
    pub fn display_path<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.base_path).unwrap_or(path)
    }

    /// Resolve a project-relative path.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.base_path.join(path)
    }
}

//! Filesystem-based project loader.
//!
//! Parses the `buildtree.toml` manifest at a project root into domain
//! [`AppConfig`] values ready for the create pipeline.
//!
//! # `buildtree.toml` format
//!
//! ```toml
//! [project]
//! name    = "Hello Project"      # optional
//! bundle  = "com.example"        # default for every app
//! version = "0.0.1"
//! author  = "Jane Developer"
//! license = { file = "LICENSE" }
//! requires = ["requests"]        # prepended to every app's requires
//!
//! [apps.first]
//! formal_name = "First App"
//! description = "The first simple app"
//! sources     = ["src/first"]
//! icon        = "resources/first"
//!
//! # Platform overrides; a nested table narrows to one output format.
//! [apps.first.linux]
//! requires = ["pygobject"]
//!
//! [apps.first.linux.flatpak]
//! supported = false
//! ```
//!
//! Scalars set on an app replace the project default; lists are appended to it.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use buildtree_core::domain::{AppConfig, DomainError, License, PlatformOverrides};
use serde::Deserialize;
use tracing::{debug, instrument};

/// File name of the project manifest.
pub const PROJECT_MANIFEST: &str = "buildtree.toml";

// ── Manifest types ────────────────────────────────────────────────────────────

/// Deserialised representation of a `buildtree.toml` file.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ProjectManifest {
    pub project: ProjectSection,
    pub apps: BTreeMap<String, AppSection>,
}

/// `[project]` section: defaults shared by every app.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ProjectSection {
    pub name: Option<String>,
    pub bundle: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub license: Option<License>,
    pub requires: Vec<String>,
    pub test_requires: Vec<String>,
    pub template: Option<PathBuf>,
    pub cleanup_paths: Vec<String>,
}

/// One `[apps.<name>]` table.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppSection {
    pub formal_name: Option<String>,
    pub bundle: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub sources: Vec<PathBuf>,
    pub test_sources: Vec<PathBuf>,
    pub requires: Vec<String>,
    pub test_requires: Vec<String>,
    pub icon: Option<PathBuf>,
    pub license: Option<License>,
    pub supported: Option<bool>,
    pub template: Option<PathBuf>,
    pub cleanup_paths: Vec<String>,
    /// Every other sub-table is a platform override.
    #[serde(flatten)]
    pub platforms: BTreeMap<String, PlatformOverrides>,
}

// ── Project ───────────────────────────────────────────────────────────────────

/// A loaded project: its root directory and its apps, sorted by name.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    name: Option<String>,
    apps: Vec<AppConfig>,
}

impl Project {
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn apps(&self) -> &[AppConfig] {
        &self.apps
    }

    pub fn app(&self, name: &str) -> Option<&AppConfig> {
        self.apps.iter().find(|app| app.app_name() == name)
    }

    /// One named app, or all of them when `name` is `None`.
    pub fn select(&self, name: Option<&str>) -> Result<Vec<&AppConfig>, DomainError> {
        match name {
            None => Ok(self.apps.iter().collect()),
            Some(name) => self.app(name).map(|app| vec![app]).ok_or_else(|| {
                DomainError::InvalidManifest(format!(
                    "no app named '{}'; available: {}",
                    name,
                    self.apps
                        .iter()
                        .map(AppConfig::app_name)
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            }),
        }
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

/// Loads a [`Project`] from `<root>/buildtree.toml`.
///
/// # Example
///
/// ```no_run
/// use buildtree_adapters::project_loader::ProjectLoader;
///
/// let project = ProjectLoader::new(".").load()?;
/// println!("Loaded {} apps", project.apps().len());
/// # Ok::<(), buildtree_core::domain::DomainError>(())
/// ```
pub struct ProjectLoader {
    root: PathBuf,
}

impl ProjectLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(PROJECT_MANIFEST)
    }

    /// Read, parse and validate the manifest.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidManifest`] if the file is missing,
    /// unreadable, malformed or defines no apps, and the builder's
    /// validation error for an invalid app.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn load(&self) -> Result<Project, DomainError> {
        let path = self.manifest_path();
        let raw = fs::read_to_string(&path).map_err(|e| {
            DomainError::InvalidManifest(format!("failed to read '{}': {e}", path.display()))
        })?;
        let project = self.parse(&raw)?;
        debug!(count = project.apps.len(), "Loaded project");
        Ok(project)
    }

    /// Parse manifest text as if it had been read from this loader's root.
    pub fn parse(&self, raw: &str) -> Result<Project, DomainError> {
        let manifest: ProjectManifest = toml::from_str(raw).map_err(|e| {
            DomainError::InvalidManifest(format!(
                "failed to parse '{}': {e}",
                self.manifest_path().display()
            ))
        })?;

        if manifest.apps.is_empty() {
            return Err(DomainError::InvalidManifest(format!(
                "'{}' defines no [apps.<name>] tables",
                self.manifest_path().display()
            )));
        }

        let apps = manifest
            .apps
            .iter()
            .map(|(name, section)| build_app(name, &manifest.project, section))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Project {
            root: self.root.clone(),
            name: manifest.project.name,
            apps,
        })
    }
}

fn build_app(
    name: &str,
    project: &ProjectSection,
    app: &AppSection,
) -> Result<AppConfig, DomainError> {
    let bundle = app
        .bundle
        .as_ref()
        .or(project.bundle.as_ref())
        .ok_or(DomainError::MissingRequiredField { field: "bundle" })?;

    let mut builder = AppConfig::builder(name, bundle.as_str())
        .sources(app.sources.iter().cloned())
        .test_sources(app.test_sources.iter().cloned())
        .requires(project.requires.iter().chain(&app.requires).cloned())
        .test_requires(project.test_requires.iter().chain(&app.test_requires).cloned())
        .cleanup_paths(project.cleanup_paths.iter().chain(&app.cleanup_paths).cloned())
        .supported(app.supported.unwrap_or(true));

    if let Some(formal_name) = &app.formal_name {
        builder = builder.formal_name(formal_name.as_str());
    }
    if let Some(version) = app.version.as_ref().or(project.version.as_ref()) {
        builder = builder.version(version.as_str());
    }
    if let Some(description) = app.description.as_ref().or(project.description.as_ref()) {
        builder = builder.description(description.as_str());
    }
    if let Some(author) = app.author.as_ref().or(project.author.as_ref()) {
        builder = builder.author(author.as_str());
    }
    if let Some(license) = app.license.as_ref().or(project.license.as_ref()) {
        builder = builder.license(license.clone());
    }
    if let Some(icon) = &app.icon {
        builder = builder.icon(icon.clone());
    }
    if let Some(template) = app.template.as_ref().or(project.template.as_ref()) {
        builder = builder.template(template.clone());
    }
    for (platform, overrides) in &app.platforms {
        builder = builder.platform_overrides(platform.as_str(), overrides.clone());
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use buildtree_core::domain::BuildTarget;

    use super::*;

    const MANIFEST: &str = r#"
[project]
name = "Hello Project"
bundle = "com.example"
version = "0.0.1"
license = { file = "LICENSE" }
requires = ["common"]

[apps.first]
formal_name = "First App"
description = "The first simple app"
sources = ["src/first"]

[apps.first.linux]
requires = ["pygobject"]

[apps.first.linux.flatpak]
supported = false

[apps.second]
bundle = "org.example"
version = "1.0"
sources = ["src/second"]
"#;

    fn project() -> Project {
        ProjectLoader::new("/projects/hello").parse(MANIFEST).unwrap()
    }

    #[test]
    fn apps_inherit_project_defaults() {
        let project = project();
        assert_eq!(project.name(), Some("Hello Project"));
        assert_eq!(
            project.apps().iter().map(AppConfig::app_name).collect::<Vec<_>>(),
            ["first", "second"]
        );

        let first = project.app("first").unwrap();
        assert_eq!(first.formal_name(), "First App");
        assert_eq!(first.bundle_identifier(), "com.example.first");
        assert_eq!(first.requires(), ["common"]);
        assert_eq!(first.license(), &License::file("LICENSE"));

        let second = project.app("second").unwrap();
        assert_eq!(second.bundle_identifier(), "org.example.second");
        assert_eq!(second.version(), "1.0");
    }

    #[test]
    fn platform_tables_become_overrides() {
        let first = project().app("first").unwrap().clone();

        let linux = first.for_target(&BuildTarget::new("linux", "system").unwrap());
        assert_eq!(linux.requires(), ["common", "pygobject"]);
        assert!(linux.supported());

        let flatpak = first.for_target(&BuildTarget::new("linux", "flatpak").unwrap());
        assert!(!flatpak.supported());

        let macos = first.for_target(&BuildTarget::new("macos", "app").unwrap());
        assert_eq!(macos.requires(), ["common"]);
    }

    #[test]
    fn select_by_name() {
        let project = project();
        assert_eq!(project.select(None).unwrap().len(), 2);
        assert_eq!(project.select(Some("second")).unwrap()[0].app_name(), "second");
        assert!(matches!(
            project.select(Some("third")),
            Err(DomainError::InvalidManifest(msg)) if msg.contains("first, second")
        ));
    }

    #[test]
    fn missing_bundle_is_rejected() {
        let err = ProjectLoader::new(".")
            .parse("[apps.first]\nsources = [\"src/first\"]\n")
            .unwrap_err();
        assert_eq!(err, DomainError::MissingRequiredField { field: "bundle" });
    }

    #[test]
    fn empty_manifest_is_rejected() {
        let err = ProjectLoader::new(".").parse("[project]\n").unwrap_err();
        assert!(matches!(err, DomainError::InvalidManifest(_)));
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(PROJECT_MANIFEST), MANIFEST).unwrap();

        let project = ProjectLoader::new(dir.path()).load().unwrap();
        assert_eq!(project.root(), dir.path());
        assert_eq!(project.apps().len(), 2);

        assert!(ProjectLoader::new(dir.path().join("missing")).load().is_err());
    }
}

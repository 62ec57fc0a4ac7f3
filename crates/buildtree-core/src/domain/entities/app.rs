//! The `AppConfig` aggregate: everything the create pipeline knows about one app.
//!
//! An `AppConfig` is built once (from the project manifest, or by hand in
//! tests) and then only borrowed. Per-platform override tables are merged with
//! [`AppConfig::for_target`] before the pipeline looks at any field, so every
//! step sees the effective values for the platform being built.
//!
//! # Domain purity
//!
//! This module must not import `tracing`. Observability is the responsibility
//! of the application and CLI layers, not the domain.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{entities::target::BuildTarget, error::DomainError};

/// License information declared by an app.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    /// Project-relative path of the license file.
    #[serde(default)]
    pub file: Option<PathBuf>,
    /// Inline license text (SPDX expression or full text).
    #[serde(default)]
    pub text: Option<String>,
}

impl License {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            file: Some(path.into()),
            text: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            file: None,
            text: Some(text.into()),
        }
    }
}

/// Settings that replace or extend the app's base values on one platform
/// (and, through `formats`, on one output format of that platform).
///
/// Scalars replace the base value; lists are appended to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformOverrides {
    pub supported: Option<bool>,
    pub template: Option<PathBuf>,
    pub requires: Vec<String>,
    pub test_requires: Vec<String>,
    pub cleanup_paths: Vec<String>,
    /// Output-format specific overrides, keyed by format identifier.
    #[serde(flatten)]
    pub formats: BTreeMap<String, PlatformOverrides>,
}

impl PlatformOverrides {
    fn apply_to(&self, app: &mut AppConfig) {
        if let Some(supported) = self.supported {
            app.supported = supported;
        }
        if let Some(template) = &self.template {
            app.template = Some(template.clone());
        }
        app.requires.extend(self.requires.iter().cloned());
        app.test_requires.extend(self.test_requires.iter().cloned());
        app.cleanup_paths.extend(self.cleanup_paths.iter().cloned());
    }
}

/// Identity and build metadata for one application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    app_name: String,
    formal_name: String,
    bundle: String,
    version: String,
    description: String,
    author: Option<String>,
    sources: Vec<PathBuf>,
    test_sources: Vec<PathBuf>,
    requires: Vec<String>,
    test_requires: Vec<String>,
    icon: Option<PathBuf>,
    license: License,
    supported: bool,
    template: Option<PathBuf>,
    cleanup_paths: Vec<String>,
    overrides: BTreeMap<String, PlatformOverrides>,
}

impl AppConfig {
    /// Start building an app definition.
    pub fn builder(app_name: impl Into<String>, bundle: impl Into<String>) -> AppConfigBuilder {
        AppConfigBuilder::new(app_name, bundle)
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }
    pub fn formal_name(&self) -> &str {
        &self.formal_name
    }
    pub fn bundle(&self) -> &str {
        &self.bundle
    }
    pub fn version(&self) -> &str {
        &self.version
    }
    pub fn description(&self) -> &str {
        &self.description
    }
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }
    pub fn test_sources(&self) -> &[PathBuf] {
        &self.test_sources
    }
    pub fn requires(&self) -> &[String] {
        &self.requires
    }
    pub fn test_requires(&self) -> &[String] {
        &self.test_requires
    }
    pub fn icon(&self) -> Option<&Path> {
        self.icon.as_deref()
    }
    pub fn license(&self) -> &License {
        &self.license
    }
    pub const fn supported(&self) -> bool {
        self.supported
    }
    pub fn template(&self) -> Option<&Path> {
        self.template.as_deref()
    }
    pub fn cleanup_paths(&self) -> &[String] {
        &self.cleanup_paths
    }
    pub fn overrides(&self) -> &BTreeMap<String, PlatformOverrides> {
        &self.overrides
    }

    /// Python-style module name: the app name with `-` replaced by `_`.
    pub fn module_name(&self) -> String {
        self.app_name.replace('-', "_")
    }

    /// Fully qualified identifier, `<bundle>.<app_name>`.
    pub fn bundle_identifier(&self) -> String {
        format!("{}.{}", self.bundle, self.app_name)
    }

    /// Sources to place in the bundle; test sources are included in test mode.
    pub fn sources_for(&self, test_mode: bool) -> Vec<&Path> {
        let tests: &[PathBuf] = if test_mode { &self.test_sources } else { &[] };
        self.sources
            .iter()
            .chain(tests)
            .map(PathBuf::as_path)
            .collect()
    }

    /// Requirements to install; test requirements are included in test mode.
    pub fn requires_for(&self, test_mode: bool) -> Vec<String> {
        let mut requires = self.requires.clone();
        if test_mode {
            requires.extend(self.test_requires.iter().cloned());
        }
        requires
    }

    /// The effective configuration for one build target.
    ///
    /// Applies the platform table first, then the `platform.format` table.
    /// The returned value carries no overrides of its own.
    pub fn for_target(&self, target: &BuildTarget) -> AppConfig {
        let mut merged = self.clone();
        merged.overrides = BTreeMap::new();

        if let Some(platform) = self.overrides.get(target.platform()) {
            platform.apply_to(&mut merged);
            if let Some(format) = platform.formats.get(target.output_format()) {
                format.apply_to(&mut merged);
            }
        }
        merged
    }

    /// Validate this app's internal consistency.
    ///
    /// Called automatically by the builder.
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_app_name(&self.app_name)?;
        validate_bundle(&self.bundle)?;

        if self.version.trim().is_empty() {
            return Err(DomainError::MissingRequiredField { field: "version" });
        }
        if self.sources.is_empty() {
            return Err(DomainError::MissingRequiredField { field: "sources" });
        }
        for source in self.sources.iter().chain(&self.test_sources) {
            if source.is_absolute() {
                return Err(DomainError::InvalidSourcePath {
                    path: source.display().to_string(),
                    reason: "sources must be relative to the project root".into(),
                });
            }
            if source.file_name().is_none() {
                return Err(DomainError::InvalidSourcePath {
                    path: source.display().to_string(),
                    reason: "source has no final path component".into(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.app_name, self.version, self.bundle_identifier())
    }
}

/// Words that cannot be app names because they collide with the module
/// namespace the generated bundle imports from.
const RESERVED_NAMES: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif",
    "else", "except", "false", "finally", "for", "from", "global", "if", "import", "in", "is",
    "lambda", "none", "nonlocal", "not", "or", "pass", "raise", "return", "true", "try", "while",
    "with", "yield", "main", "test", "tests", "app", "build",
];

fn validate_app_name(name: &str) -> Result<(), DomainError> {
    let invalid = |reason: &str| DomainError::InvalidAppName {
        name: name.into(),
        reason: reason.into(),
    };

    let mut chars = name.chars();
    match chars.next() {
        None => return Err(invalid("name cannot be empty")),
        Some(c) if !c.is_ascii_alphabetic() => {
            return Err(invalid("name must start with a letter"));
        }
        Some(_) => {}
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(invalid("name may only contain letters, digits, '-' and '_'"));
    }
    if name.ends_with(['-', '_']) {
        return Err(invalid("name cannot end with '-' or '_'"));
    }
    if RESERVED_NAMES.contains(&name.to_ascii_lowercase().as_str()) {
        return Err(invalid("name is a reserved word"));
    }
    Ok(())
}

fn validate_bundle(bundle: &str) -> Result<(), DomainError> {
    let invalid = |reason: &str| DomainError::InvalidBundle {
        bundle: bundle.into(),
        reason: reason.into(),
    };

    if bundle.is_empty() {
        return Err(invalid("bundle cannot be empty"));
    }
    for segment in bundle.split('.') {
        let mut chars = segment.chars();
        match chars.next() {
            None => return Err(invalid("bundle contains an empty segment")),
            Some(c) if !c.is_ascii_alphabetic() => {
                return Err(invalid("each segment must start with a letter"));
            }
            Some(_) => {}
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(invalid("segments may only contain letters, digits and '-'"));
        }
    }
    Ok(())
}

// ── Builder ───────────────────────────────────────────────────────────────────

/// Builder for [`AppConfig`]. `build()` runs full validation.
#[derive(Debug, Clone)]
pub struct AppConfigBuilder {
    app: AppConfig,
}

impl AppConfigBuilder {
    fn new(app_name: impl Into<String>, bundle: impl Into<String>) -> Self {
        let app_name = app_name.into();
        Self {
            app: AppConfig {
                formal_name: app_name.clone(),
                app_name,
                bundle: bundle.into(),
                version: "0.0.1".into(),
                description: String::new(),
                author: None,
                sources: Vec::new(),
                test_sources: Vec::new(),
                requires: Vec::new(),
                test_requires: Vec::new(),
                icon: None,
                license: License::default(),
                supported: true,
                template: None,
                cleanup_paths: Vec::new(),
                overrides: BTreeMap::new(),
            },
        }
    }

    pub fn formal_name(mut self, formal_name: impl Into<String>) -> Self {
        self.app.formal_name = formal_name.into();
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.app.version = version.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.app.description = description.into();
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.app.author = Some(author.into());
        self
    }

    pub fn source(mut self, source: impl Into<PathBuf>) -> Self {
        self.app.sources.push(source.into());
        self
    }

    pub fn sources<I, P>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.app.sources.extend(sources.into_iter().map(Into::into));
        self
    }

    pub fn test_sources<I, P>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.app.test_sources.extend(sources.into_iter().map(Into::into));
        self
    }

    pub fn requires<I, S>(mut self, requires: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.app.requires.extend(requires.into_iter().map(Into::into));
        self
    }

    pub fn test_requires<I, S>(mut self, requires: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.app
            .test_requires
            .extend(requires.into_iter().map(Into::into));
        self
    }

    pub fn icon(mut self, icon: impl Into<PathBuf>) -> Self {
        self.app.icon = Some(icon.into());
        self
    }

    pub fn license(mut self, license: License) -> Self {
        self.app.license = license;
        self
    }

    pub fn supported(mut self, supported: bool) -> Self {
        self.app.supported = supported;
        self
    }

    pub fn template(mut self, template: impl Into<PathBuf>) -> Self {
        self.app.template = Some(template.into());
        self
    }

    pub fn cleanup_paths<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.app
            .cleanup_paths
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn platform_overrides(
        mut self,
        platform: impl Into<String>,
        overrides: PlatformOverrides,
    ) -> Self {
        self.app.overrides.insert(platform.into(), overrides);
        self
    }

    pub fn build(self) -> Result<AppConfig, DomainError> {
        self.app.validate()?;
        Ok(self.app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first() -> AppConfigBuilder {
        AppConfig::builder("first", "com.example")
            .version("0.0.1")
            .description("The first simple app")
            .source("src/first")
            .license(License::file("LICENSE"))
    }

    #[test]
    fn builds_with_derived_names() {
        let app = AppConfig::builder("hello-world", "com.example")
            .source("src/hello_world")
            .build()
            .unwrap();

        assert_eq!(app.formal_name(), "hello-world");
        assert_eq!(app.module_name(), "hello_world");
        assert_eq!(app.bundle_identifier(), "com.example.hello-world");
        assert!(app.supported());
    }

    #[test]
    fn rejects_invalid_names() {
        for name in ["", "1app", "my app", "trailing-", "import", "Main"] {
            let result = AppConfig::builder(name, "com.example")
                .source("src/x")
                .build();
            assert!(
                matches!(result, Err(DomainError::InvalidAppName { .. })),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_invalid_bundles() {
        for bundle in ["", "com..example", "com.1example", "com.ex ample"] {
            let result = AppConfig::builder("first", bundle).source("src/x").build();
            assert!(matches!(result, Err(DomainError::InvalidBundle { .. })));
        }
    }

    #[test]
    fn requires_sources() {
        let result = AppConfig::builder("first", "com.example").build();
        assert_eq!(
            result.unwrap_err(),
            DomainError::MissingRequiredField { field: "sources" }
        );
    }

    #[test]
    fn rejects_absolute_sources() {
        let result = AppConfig::builder("first", "com.example")
            .source("/src/first")
            .build();
        assert!(matches!(result, Err(DomainError::InvalidSourcePath { .. })));
    }

    #[test]
    fn test_mode_adds_test_sources_and_requirements() {
        let app = first()
            .test_sources(["tests"])
            .requires(["toga"])
            .test_requires(["pytest"])
            .build()
            .unwrap();

        assert_eq!(app.sources_for(false), vec![Path::new("src/first")]);
        assert_eq!(
            app.sources_for(true),
            vec![Path::new("src/first"), Path::new("tests")]
        );
        assert_eq!(app.requires_for(false), vec!["toga".to_string()]);
        assert_eq!(
            app.requires_for(true),
            vec!["toga".to_string(), "pytest".to_string()]
        );
    }

    #[test]
    fn overrides_merge_platform_then_format() {
        let mut linux = PlatformOverrides {
            requires: vec!["linux-extra".into()],
            ..Default::default()
        };
        linux.formats.insert(
            "flatpak".into(),
            PlatformOverrides {
                supported: Some(false),
                requires: vec!["flatpak-extra".into()],
                ..Default::default()
            },
        );
        let app = first()
            .requires(["base"])
            .platform_overrides("linux", linux)
            .build()
            .unwrap();

        let system = app.for_target(&BuildTarget::new("linux", "system").unwrap());
        assert!(system.supported());
        assert_eq!(system.requires(), ["base", "linux-extra"]);
        assert!(system.overrides().is_empty());

        let flatpak = app.for_target(&BuildTarget::new("linux", "flatpak").unwrap());
        assert!(!flatpak.supported());
        assert_eq!(flatpak.requires(), ["base", "linux-extra", "flatpak-extra"]);

        let windows = app.for_target(&BuildTarget::new("windows", "app").unwrap());
        assert_eq!(windows.requires(), ["base"]);
    }
}

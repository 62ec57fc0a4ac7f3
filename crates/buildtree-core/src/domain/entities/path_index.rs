//! Per-app path index: facts a template declares about its own layout.
//!
//! Templates ship the index as the `[paths]` table of `bundle.toml`; the
//! create pipeline reads it right after materialization and every later step
//! consults it (where code goes, where the support package goes, whether a
//! stub binary is needed, what to clean up).
//!
//! | Key                     | Default        | Used by        |
//! |-------------------------|----------------|----------------|
//! | `app_path`              | `app`          | `code`         |
//! | `app_packages_path`     | `app_packages` | `requirements` |
//! | `app_requirements_path` | none           | `requirements` |
//! | `support_path`          | none           | `support`      |
//! | `support_revision`      | `latest`       | `support`      |
//! | `stub_binary_revision`  | none           | `stub`         |
//! | `cleanup_paths`         | `[]`           | `cleanup`      |
//! | `icon`                  | `{}`           | `resources`    |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{entities::common::RelativePath, error::DomainError};

pub const DEFAULT_APP_PATH: &str = "app";
pub const DEFAULT_APP_PACKAGES_PATH: &str = "app_packages";
pub const DEFAULT_SUPPORT_REVISION: &str = "latest";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathIndex {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_packages_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_requirements_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support_revision: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stub_binary_revision: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cleanup_paths: Vec<String>,
    /// Icon variant (e.g. `"256"`, `"round"`) to bundle-relative target path.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub icon: BTreeMap<String, String>,
}

impl PathIndex {
    /// Index with a stub binary revision declared.
    pub fn with_stub_binary_revision(mut self, revision: impl Into<String>) -> Self {
        self.stub_binary_revision = Some(revision.into());
        self
    }

    pub fn app_path(&self) -> &str {
        self.app_path.as_deref().unwrap_or(DEFAULT_APP_PATH)
    }

    pub fn app_packages_path(&self) -> &str {
        self.app_packages_path
            .as_deref()
            .unwrap_or(DEFAULT_APP_PACKAGES_PATH)
    }

    pub fn app_requirements_path(&self) -> Option<&str> {
        self.app_requirements_path.as_deref()
    }

    pub fn support_path(&self) -> Option<&str> {
        self.support_path.as_deref()
    }

    pub fn support_revision(&self) -> &str {
        self.support_revision
            .as_deref()
            .unwrap_or(DEFAULT_SUPPORT_REVISION)
    }

    pub fn stub_binary_revision(&self) -> Option<&str> {
        self.stub_binary_revision.as_deref()
    }

    /// Whether the template needs the `stub` step.
    pub fn requires_stub(&self) -> bool {
        self.stub_binary_revision.is_some()
    }

    /// Every bundle-relative path the index declares.
    pub fn declared_paths(&self) -> impl Iterator<Item = &str> {
        [
            Some(self.app_path()),
            Some(self.app_packages_path()),
            self.app_requirements_path(),
            self.support_path(),
        ]
        .into_iter()
        .flatten()
        .chain(self.icon.values().map(String::as_str))
    }

    /// Every declared path must be relative and stay inside the bundle.
    pub fn validate(&self) -> Result<(), DomainError> {
        for path in self.declared_paths() {
            RelativePath::try_new(path)?;
        }
        for pattern in &self.cleanup_paths {
            RelativePath::try_new(pattern)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_absent() {
        let index = PathIndex::default();
        assert_eq!(index.app_path(), "app");
        assert_eq!(index.app_packages_path(), "app_packages");
        assert_eq!(index.support_revision(), "latest");
        assert!(index.support_path().is_none());
        assert!(!index.requires_stub());
        assert!(index.validate().is_ok());
    }

    #[test]
    fn stub_revision_marks_stub_required() {
        let index = PathIndex::default().with_stub_binary_revision("b1");
        assert!(index.requires_stub());
        assert_eq!(index.stub_binary_revision(), Some("b1"));
    }

    #[test]
    fn rejects_paths_outside_bundle() {
        let index = PathIndex {
            support_path: Some("../support".into()),
            ..Default::default()
        };
        assert!(matches!(
            index.validate(),
            Err(DomainError::PathEscapesBundle { .. })
        ));

        let mut index = PathIndex::default();
        index.icon.insert("256".into(), "/tmp/icon.png".into());
        assert!(matches!(
            index.validate(),
            Err(DomainError::AbsolutePathNotAllowed { .. })
        ));
    }

    #[test]
    fn rejects_escaping_cleanup_patterns() {
        let index = PathIndex {
            cleanup_paths: vec!["../**".into()],
            ..Default::default()
        };
        assert!(index.validate().is_err());
    }
}

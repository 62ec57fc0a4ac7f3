//! Path index stores.
//!
//! The TOML store keeps the index where templates put it: the `[paths]` table
//! of `bundle.toml` at the bundle root. Other tables in that file belong to
//! the template and are preserved on save.
//!
//! ```toml
//! [paths]
//! app_path = "src/app"
//! support_path = "support"
//! stub_binary_revision = "b1"
//! cleanup_paths = ["**/__pycache__"]
//!
//! [paths.icon]
//! 256 = "share/icons/256.png"
//! ```

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use buildtree_core::{
    application::{ApplicationError, ports::PathIndexStore},
    domain::{AppConfig, PathIndex},
    error::{BuildtreeError, BuildtreeResult},
};
use tracing::debug;

/// Name of the per-bundle manifest that carries the index.
pub const BUNDLE_MANIFEST: &str = "bundle.toml";

const PATHS_TABLE: &str = "paths";

/// Reads and writes `<bundle>/bundle.toml`. Nothing is cached: every load
/// sees the file as the template (or a previous save) left it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlPathIndexStore;

impl TomlPathIndexStore {
    pub fn new() -> Self {
        Self
    }

    fn manifest_path(bundle_path: &Path) -> PathBuf {
        bundle_path.join(BUNDLE_MANIFEST)
    }

    fn read_table(path: &Path) -> BuildtreeResult<Option<toml::Table>> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path).map_err(|e| index_error(path, e))?;
        raw.parse::<toml::Table>()
            .map(Some)
            .map_err(|e| index_error(path, e))
    }
}

impl PathIndexStore for TomlPathIndexStore {
    fn load(&self, app: &AppConfig, bundle_path: &Path) -> BuildtreeResult<Option<PathIndex>> {
        let path = Self::manifest_path(bundle_path);
        let Some(mut table) = Self::read_table(&path)? else {
            debug!(app = app.app_name(), "No {} in bundle", BUNDLE_MANIFEST);
            return Ok(None);
        };
        let Some(paths) = table.remove(PATHS_TABLE) else {
            return Ok(None);
        };

        paths
            .try_into::<PathIndex>()
            .map(Some)
            .map_err(|e| index_error(&path, e))
    }

    fn save(&self, app: &AppConfig, bundle_path: &Path, index: &PathIndex) -> BuildtreeResult<()> {
        let path = Self::manifest_path(bundle_path);
        let mut table = Self::read_table(&path)?.unwrap_or_default();

        let paths = toml::Value::try_from(index).map_err(|e| index_error(&path, e))?;
        table.insert(PATHS_TABLE.to_string(), paths);

        let raw = toml::to_string_pretty(&table).map_err(|e| index_error(&path, e))?;
        fs::write(&path, raw).map_err(|e| index_error(&path, e))?;
        debug!(app = app.app_name(), path = %path.display(), "Path index saved");
        Ok(())
    }
}

/// Path index kept in memory, keyed by app name.
#[derive(Debug, Clone, Default)]
pub struct MemoryPathIndexStore {
    inner: Arc<RwLock<HashMap<String, PathIndex>>>,
}

impl MemoryPathIndexStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with an index for `app_name`.
    pub fn with_index(app_name: impl Into<String>, index: PathIndex) -> Self {
        let store = Self::new();
        if let Ok(mut inner) = store.inner.write() {
            inner.insert(app_name.into(), index);
        }
        store
    }

    /// Current index for `app_name` (testing helper).
    pub fn get(&self, app_name: &str) -> Option<PathIndex> {
        self.inner.read().ok()?.get(app_name).cloned()
    }
}

impl PathIndexStore for MemoryPathIndexStore {
    fn load(&self, app: &AppConfig, _bundle_path: &Path) -> BuildtreeResult<Option<PathIndex>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(inner.get(app.app_name()).cloned())
    }

    fn save(&self, app: &AppConfig, _bundle_path: &Path, index: &PathIndex) -> BuildtreeResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.insert(app.app_name().to_string(), index.clone());
        Ok(())
    }
}

fn index_error(path: &Path, e: impl std::fmt::Display) -> BuildtreeError {
    ApplicationError::PathIndexError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first() -> AppConfig {
        AppConfig::builder("first", "com.example")
            .source("src/first")
            .build()
            .unwrap()
    }

    #[test]
    fn reads_the_paths_table() {
        let bundle = tempfile::tempdir().unwrap();
        fs::write(
            bundle.path().join(BUNDLE_MANIFEST),
            r#"
[paths]
app_path = "src/app"
stub_binary_revision = "b1"
cleanup_paths = ["**/__pycache__"]

[paths.icon]
256 = "share/icon-256.png"
"#,
        )
        .unwrap();

        let index = TomlPathIndexStore::new()
            .load(&first(), bundle.path())
            .unwrap()
            .unwrap();

        assert_eq!(index.app_path(), "src/app");
        assert_eq!(index.stub_binary_revision(), Some("b1"));
        assert_eq!(index.cleanup_paths, ["**/__pycache__"]);
        assert_eq!(index.icon["256"], "share/icon-256.png");
        assert_eq!(index.app_packages_path(), "app_packages");
    }

    #[test]
    fn missing_file_or_table_is_none() {
        let bundle = tempfile::tempdir().unwrap();
        let store = TomlPathIndexStore::new();
        assert!(store.load(&first(), bundle.path()).unwrap().is_none());

        fs::write(bundle.path().join(BUNDLE_MANIFEST), "[template]\nname = \"x\"\n").unwrap();
        assert!(store.load(&first(), bundle.path()).unwrap().is_none());
    }

    #[test]
    fn save_keeps_other_tables() {
        let bundle = tempfile::tempdir().unwrap();
        fs::write(bundle.path().join(BUNDLE_MANIFEST), "[template]\nname = \"x\"\n").unwrap();

        let store = TomlPathIndexStore::new();
        let index = PathIndex::default().with_stub_binary_revision("b1");
        store.save(&first(), bundle.path(), &index).unwrap();

        let raw = fs::read_to_string(bundle.path().join(BUNDLE_MANIFEST)).unwrap();
        assert!(raw.contains("[template]"));
        assert_eq!(store.load(&first(), bundle.path()).unwrap(), Some(index));
    }

    #[test]
    fn malformed_manifest_is_an_index_error() {
        let bundle = tempfile::tempdir().unwrap();
        fs::write(bundle.path().join(BUNDLE_MANIFEST), "[paths\n").unwrap();

        let err = TomlPathIndexStore::new()
            .load(&first(), bundle.path())
            .unwrap_err();
        assert!(matches!(
            err,
            BuildtreeError::Application(ApplicationError::PathIndexError { .. })
        ));
    }

    #[test]
    fn memory_store_is_keyed_by_app() {
        let store = MemoryPathIndexStore::with_index(
            "first",
            PathIndex::default().with_stub_binary_revision("b1"),
        );
        let other = AppConfig::builder("second", "com.example")
            .source("src/second")
            .build()
            .unwrap();

        assert!(store.load(&first(), Path::new("/x")).unwrap().is_some());
        assert!(store.load(&other, Path::new("/x")).unwrap().is_none());
    }
}

//! Local asset cache for support packages and stub binaries.
//!
//! ```text
//! <cache>/
//! ├── support/<platform>/<format>/<revision>/...     unpacked support package
//! └── stubs/<platform>/<format>/<revision>/Stub[.exe]
//! ```
//!
//! Nothing is downloaded; a missing entry is reported with the path where it
//! was expected.

use std::{
    fs,
    path::{Path, PathBuf},
};

use buildtree_core::{
    application::{ApplicationError, ports::AssetProvider},
    domain::{BuildTarget, ExecutableNaming},
    error::BuildtreeResult,
};
use tracing::debug;

const SUPPORT_DIR: &str = "support";
const STUBS_DIR: &str = "stubs";
const STUB_STEM: &str = "Stub";

#[derive(Debug, Clone)]
pub struct AssetCache {
    root: PathBuf,
}

impl AssetCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry(&self, kind: &str, target: &BuildTarget, revision: &str) -> PathBuf {
        self.root
            .join(kind)
            .join(target.platform())
            .join(target.output_format())
            .join(revision)
    }

    /// Where the stub for `target` at `revision` is expected.
    pub fn stub_path(&self, target: &BuildTarget, revision: &str) -> PathBuf {
        let naming: ExecutableNaming = target.executable_naming();
        self.entry(STUBS_DIR, target, revision)
            .join(naming.file_name(STUB_STEM))
    }
}

impl AssetProvider for AssetCache {
    fn support_package(&self, target: &BuildTarget, revision: &str) -> BuildtreeResult<PathBuf> {
        let path = self.entry(SUPPORT_DIR, target, revision);
        if !path.is_dir() {
            return Err(ApplicationError::AssetNotFound {
                kind: "support package",
                path,
            }
            .into());
        }
        debug!(path = %path.display(), "Using cached support package");
        Ok(path)
    }

    fn stub_binary(&self, target: &BuildTarget, revision: &str) -> BuildtreeResult<Vec<u8>> {
        let path = self.stub_path(target, revision);
        if !path.is_file() {
            return Err(ApplicationError::AssetNotFound {
                kind: "stub binary",
                path,
            }
            .into());
        }
        fs::read(&path).map_err(|e| {
            ApplicationError::FilesystemError {
                path: path.clone(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use buildtree_core::error::BuildtreeError;

    use super::*;

    #[test]
    fn finds_cached_assets() {
        let cache = tempfile::tempdir().unwrap();
        let target = BuildTarget::new("tester", "dummy").unwrap();
        let stub_dir = cache.path().join("stubs/tester/dummy/b1");
        fs::create_dir_all(&stub_dir).unwrap();
        fs::write(stub_dir.join("Stub"), b"stub").unwrap();
        fs::create_dir_all(cache.path().join("support/tester/dummy/latest")).unwrap();

        let assets = AssetCache::new(cache.path());
        assert_eq!(assets.stub_binary(&target, "b1").unwrap(), b"stub");
        assert_eq!(
            assets.support_package(&target, "latest").unwrap(),
            cache.path().join("support/tester/dummy/latest")
        );
    }

    #[test]
    fn windows_stubs_have_exe_suffix() {
        let target = BuildTarget::new("windows", "app").unwrap();
        let assets = AssetCache::new("/cache");
        assert_eq!(
            assets.stub_path(&target, "b3"),
            Path::new("/cache/stubs/windows/app/b3/Stub.exe")
        );
    }

    #[test]
    fn missing_assets_name_the_expected_path() {
        let cache = tempfile::tempdir().unwrap();
        let target = BuildTarget::new("tester", "dummy").unwrap();
        let err = AssetCache::new(cache.path())
            .stub_binary(&target, "b1")
            .unwrap_err();

        match err {
            BuildtreeError::Application(ApplicationError::AssetNotFound { kind, path }) => {
                assert_eq!(kind, "stub binary");
                assert!(path.ends_with("stubs/tester/dummy/b1/Stub"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

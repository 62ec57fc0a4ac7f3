//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use buildtree_core::{
    application::{ApplicationError, ports::Filesystem},
    error::BuildtreeResult,
};

/// In-memory filesystem for testing.
///
/// Clones share the same tree, so a test can keep one handle and give another
/// to the service under test.
#[derive(Debug, Clone)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, Vec<u8>>,
    directories: BTreeSet<PathBuf>,
    executables: BTreeSet<PathBuf>,
}

impl MemoryFilesystemInner {
    fn add_dirs(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.directories.insert(current.clone());
        }
    }

    fn remove_under(&mut self, path: &Path) {
        self.directories.retain(|p| !p.starts_with(path));
        self.files.retain(|p, _| !p.starts_with(path));
        self.executables.retain(|p| !p.starts_with(path));
    }
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryFilesystemInner::default())),
        }
    }

    /// Seed a file, creating its parent directories (testing helper).
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        if let Ok(mut inner) = self.inner.write() {
            let path = path.as_ref();
            if let Some(parent) = path.parent() {
                inner.add_dirs(parent);
            }
            inner.files.insert(path.to_path_buf(), content.into());
        }
    }

    /// Read a file's content as text (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        self.read_bytes(path)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Read a file's raw content (testing helper).
    pub fn read_bytes(&self, path: &Path) -> Option<Vec<u8>> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).cloned()
    }

    /// Check if a file is marked executable.
    pub fn is_executable(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.executables.contains(path))
            .unwrap_or(false)
    }

    /// List all files.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn read(&self) -> BuildtreeResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        self.inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError.into())
    }

    fn write(&self) -> BuildtreeResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError.into())
    }
}

impl Default for MemoryFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> BuildtreeResult<()> {
        self.write()?.add_dirs(path);
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> BuildtreeResult<()> {
        let mut inner = self.write()?;

        // Ensure parent exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "Parent directory does not exist".into(),
                }
                .into());
            }
        }

        inner.files.insert(path.to_path_buf(), content.to_vec());
        Ok(())
    }

    fn set_permissions(&self, path: &Path, executable: bool) -> BuildtreeResult<()> {
        let mut inner = self.write()?;

        if !inner.files.contains_key(path) {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "No such file".into(),
            }
            .into());
        }
        if executable {
            inner.executables.insert(path.to_path_buf());
        } else {
            inner.executables.remove(path);
        }

        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn remove_dir_all(&self, path: &Path) -> BuildtreeResult<()> {
        let mut inner = self.write()?;
        if inner.files.contains_key(path) {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "Not a directory".into(),
            }
            .into());
        }
        inner.remove_under(path);
        Ok(())
    }

    fn remove_path(&self, path: &Path) -> BuildtreeResult<()> {
        self.write()?.remove_under(path);
        Ok(())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> BuildtreeResult<()> {
        let mut inner = self.write()?;
        let content = inner.files.get(from).cloned().ok_or_else(|| {
            ApplicationError::FilesystemError {
                path: from.to_path_buf(),
                reason: "No such file".into(),
            }
        })?;
        if let Some(parent) = to.parent() {
            inner.add_dirs(parent);
        }
        inner.files.insert(to.to_path_buf(), content);
        Ok(())
    }

    fn copy_tree(&self, from: &Path, to: &Path) -> BuildtreeResult<()> {
        let mut inner = self.write()?;

        let files: Vec<(PathBuf, Vec<u8>)> = inner
            .files
            .iter()
            .filter_map(|(path, content)| {
                let relative = path.strip_prefix(from).ok()?;
                Some((to.join(relative), content.clone()))
            })
            .collect();
        let dirs: Vec<PathBuf> = inner
            .directories
            .iter()
            .filter_map(|path| path.strip_prefix(from).ok().map(|r| to.join(r)))
            .collect();

        if files.is_empty() && dirs.is_empty() {
            return Err(ApplicationError::FilesystemError {
                path: from.to_path_buf(),
                reason: "No such file or directory".into(),
            }
            .into());
        }

        for dir in dirs {
            inner.add_dirs(&dir);
        }
        for (path, content) in files {
            if let Some(parent) = path.parent() {
                inner.add_dirs(parent);
            }
            inner.files.insert(path, content);
        }
        Ok(())
    }

    fn list_tree(&self, root: &Path) -> BuildtreeResult<Vec<PathBuf>> {
        let inner = self.read()?;
        let entries: BTreeSet<PathBuf> = inner
            .directories
            .iter()
            .chain(inner.files.keys())
            .filter_map(|path| path.strip_prefix(root).ok())
            .filter(|relative| !relative.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .collect();
        Ok(entries.into_iter().collect())
    }
}

//! Local filesystem adapter using std::fs.

use std::io;
use std::path::{Path, PathBuf};

use buildtree_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{BuildtreeError, BuildtreeResult},
};
use walkdir::WalkDir;

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> BuildtreeResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> BuildtreeResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn set_permissions(&self, path: &Path, executable: bool) -> BuildtreeResult<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let metadata =
                std::fs::metadata(path).map_err(|e| map_io_error(path, e, "get metadata"))?;
            let mut perms = metadata.permissions();
            let mode = perms.mode();
            perms.set_mode(if executable { mode | 0o111 } else { mode & !0o111 });
            std::fs::set_permissions(path, perms)
                .map_err(|e| map_io_error(path, e, "set permissions"))?;
        }
        #[cfg(windows)]
        {
            // Windows doesn't have executable bit in the same way
            let _ = (path, executable);
        }
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove_dir_all(&self, path: &Path) -> BuildtreeResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }

    fn remove_path(&self, path: &Path) -> BuildtreeResult<()> {
        let result = if path.is_dir() {
            std::fs::remove_dir_all(path)
        } else {
            std::fs::remove_file(path)
        };
        result.map_err(|e| map_io_error(path, e, "remove"))
    }

    fn copy_file(&self, from: &Path, to: &Path) -> BuildtreeResult<()> {
        if let Some(parent) = to.parent() {
            self.create_dir_all(parent)?;
        }
        std::fs::copy(from, to)
            .map(|_| ())
            .map_err(|e| map_io_error(from, e, "copy file"))
    }

    fn copy_tree(&self, from: &Path, to: &Path) -> BuildtreeResult<()> {
        if from.is_file() {
            return self.copy_file(from, to);
        }

        for entry in WalkDir::new(from) {
            let entry = entry.map_err(|e| walk_error(from, e))?;
            let relative = entry
                .path()
                .strip_prefix(from)
                .map_err(|e| map_io_error(entry.path(), io::Error::other(e), "copy"))?;
            let target = to.join(relative);

            if entry.file_type().is_dir() {
                self.create_dir_all(&target)?;
            } else {
                std::fs::copy(entry.path(), &target)
                    .map_err(|e| map_io_error(entry.path(), e, "copy file"))?;
            }
        }
        Ok(())
    }

    fn list_tree(&self, root: &Path) -> BuildtreeResult<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in WalkDir::new(root).min_depth(1) {
            let entry = entry.map_err(|e| walk_error(root, e))?;
            if let Ok(relative) = entry.path().strip_prefix(root) {
                entries.push(relative.to_path_buf());
            }
        }
        entries.sort();
        Ok(entries)
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> BuildtreeError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

fn walk_error(root: &Path, e: walkdir::Error) -> BuildtreeError {
    let path = e.path().unwrap_or(root).to_path_buf();
    ApplicationError::FilesystemError {
        path,
        reason: format!("Failed to walk directory: {}", e),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_tree_copies_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src/first");
        std::fs::create_dir_all(src.join("pkg")).unwrap();
        std::fs::write(src.join("__main__.py"), "print('hi')").unwrap();
        std::fs::write(src.join("pkg/mod.py"), "x = 1").unwrap();

        let fs = LocalFilesystem::new();
        let dest = dir.path().join("bundle/app/first");
        fs.copy_tree(&src, &dest).unwrap();

        assert_eq!(
            std::fs::read_to_string(dest.join("pkg/mod.py")).unwrap(),
            "x = 1"
        );
        assert_eq!(
            fs.list_tree(&dest).unwrap(),
            [
                PathBuf::from("__main__.py"),
                PathBuf::from("pkg"),
                PathBuf::from("pkg/mod.py"),
            ]
        );
    }

    #[test]
    fn copy_tree_accepts_a_single_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("single.py"), "pass").unwrap();

        let fs = LocalFilesystem::new();
        let dest = dir.path().join("out/single.py");
        fs.copy_tree(&dir.path().join("single.py"), &dest).unwrap();
        assert!(dest.is_file());
    }

    #[test]
    fn remove_path_handles_files_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("d/e")).unwrap();
        std::fs::write(dir.path().join("f.txt"), "x").unwrap();

        let fs = LocalFilesystem::new();
        fs.remove_path(&dir.path().join("d")).unwrap();
        fs.remove_path(&dir.path().join("f.txt")).unwrap();
        assert!(fs.list_tree(dir.path()).unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn set_permissions_toggles_executable_bit() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Stub");
        let fs = LocalFilesystem::new();
        fs.write_file(&path, b"\x7fELF").unwrap();

        fs.set_permissions(&path, true).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111);

        fs.set_permissions(&path, false).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0);
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = LocalFilesystem::new()
            .write_file(&dir.path().join("missing/file"), b"x")
            .unwrap_err();
        assert!(matches!(
            err,
            BuildtreeError::Application(ApplicationError::FilesystemError { .. })
        ));
    }
}

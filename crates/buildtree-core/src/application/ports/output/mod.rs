//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `buildtree-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

#[cfg(test)]
use mockall::automock;

use crate::domain::{AppConfig, BuildTarget, PathIndex, RenderContext};
use crate::error::BuildtreeResult;

/// Port for user interaction.
///
/// Implemented by:
/// - `buildtree_cli::console::TerminalConsole` (production)
/// - `buildtree_adapters::console::ScriptedConsole` (testing)
#[cfg_attr(test, automock)]
pub trait Console: Send + Sync {
    /// Whether the user can be asked anything at all.
    ///
    /// When this is `false`, callers must not call [`Console::prompt`] and
    /// must behave as if `default` had been answered.
    fn input_enabled(&self) -> bool;

    /// Show `text` and block until the user answers. An empty answer means
    /// `default`.
    fn prompt(&self, text: &str, default: &str) -> BuildtreeResult<String>;
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `buildtree_adapters::filesystem::LocalFilesystem` (production)
/// - `buildtree_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> BuildtreeResult<()>;

    /// Write content to a file. The parent directory must exist.
    fn write_file(&self, path: &Path, content: &[u8]) -> BuildtreeResult<()>;

    /// Set or clear the executable bit.
    fn set_permissions(&self, path: &Path, executable: bool) -> BuildtreeResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> BuildtreeResult<()>;

    /// Remove a file or a directory tree.
    fn remove_path(&self, path: &Path) -> BuildtreeResult<()>;

    /// Copy one file, creating the destination's parent directories.
    fn copy_file(&self, from: &Path, to: &Path) -> BuildtreeResult<()>;

    /// Copy a file or a whole directory tree to `to`.
    fn copy_tree(&self, from: &Path, to: &Path) -> BuildtreeResult<()>;

    /// Every file and directory below `root`, relative to it, sorted.
    fn list_tree(&self, root: &Path) -> BuildtreeResult<Vec<PathBuf>>;
}

/// Port for template rendering.
///
/// Implemented by:
/// - `buildtree_adapters::renderer::DirectoryRenderer` (template directories)
#[cfg_attr(test, automock)]
pub trait TemplateRenderer: Send + Sync {
    /// Render the template at `template` into the (existing, empty)
    /// `destination` directory.
    fn render(
        &self,
        template: &Path,
        destination: &Path,
        context: &RenderContext,
    ) -> BuildtreeResult<()>;
}

/// Port for the persisted per-app path index.
///
/// Implemented by:
/// - `buildtree_adapters::path_index::TomlPathIndexStore` (`bundle.toml`)
/// - `buildtree_adapters::path_index::MemoryPathIndexStore` (testing)
#[cfg_attr(test, automock)]
pub trait PathIndexStore: Send + Sync {
    /// The index for `app`, or `None` if none has been recorded yet.
    fn load(&self, app: &AppConfig, bundle_path: &Path) -> BuildtreeResult<Option<PathIndex>>;

    /// Record the index for `app`.
    fn save(&self, app: &AppConfig, bundle_path: &Path, index: &PathIndex)
    -> BuildtreeResult<()>;
}

/// Port for prebuilt assets shipped alongside templates.
///
/// Implemented by:
/// - `buildtree_adapters::assets::AssetCache` (local cache directory)
#[cfg_attr(test, automock)]
pub trait AssetProvider: Send + Sync {
    /// Directory holding the unpacked support package for a target.
    fn support_package(&self, target: &BuildTarget, revision: &str) -> BuildtreeResult<PathBuf>;

    /// Contents of the stub executable for a target.
    fn stub_binary(&self, target: &BuildTarget, revision: &str) -> BuildtreeResult<Vec<u8>>;
}

/// Port for platform tools.
///
/// Implemented by:
/// - `buildtree_adapters::toolchain::HostToolchain` (tools on `PATH`)
#[cfg_attr(test, automock)]
pub trait Toolchain: Send + Sync {
    /// Check the generated bundle against the template's structural contract.
    fn verify_app_template(
        &self,
        app: &AppConfig,
        bundle_path: &Path,
        index: &PathIndex,
    ) -> BuildtreeResult<()>;

    /// Check that the tools needed to build for `target` are usable.
    fn verify_app_tools(&self, app: &AppConfig, target: &BuildTarget) -> BuildtreeResult<()>;

    /// Install `requires` into `destination`.
    fn install_requirements(
        &self,
        app: &AppConfig,
        destination: &Path,
        requires: &[String],
    ) -> BuildtreeResult<()>;
}

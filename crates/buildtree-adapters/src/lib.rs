//! Infrastructure adapters for buildtree.
//!
//! This crate implements the ports defined in `buildtree-core::application::ports`.
//! It contains all external dependencies and I/O operations, plus the
//! project manifest loader used by the CLI.

pub mod assets;
pub mod console;
pub mod filesystem;
pub mod path_index;
pub mod project_loader;
pub mod renderer;
pub mod toolchain;

// Re-export commonly used adapters
pub use assets::AssetCache;
pub use console::ScriptedConsole;
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use path_index::{MemoryPathIndexStore, TomlPathIndexStore};
pub use project_loader::{Project, ProjectLoader};
pub use renderer::DirectoryRenderer;
pub use toolchain::HostToolchain;

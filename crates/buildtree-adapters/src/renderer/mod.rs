//! Template renderer adapters.

mod directory;

pub use directory::DirectoryRenderer;

//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `buildtree-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Console`: Confirmation prompts
//!   - `Filesystem`: File operations on bundle trees
//!   - `TemplateRenderer`: Template rendering
//!   - `PathIndexStore`: Persisted per-app path index
//!   - `AssetProvider`: Support packages and stub binaries
//!   - `Toolchain`: Template/tool verification and requirement installation
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{AssetProvider, Console, Filesystem, PathIndexStore, TemplateRenderer, Toolchain};

#[cfg(test)]
pub use output::{
    MockAssetProvider, MockConsole, MockFilesystem, MockPathIndexStore, MockTemplateRenderer,
    MockToolchain,
};

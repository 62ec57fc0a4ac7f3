//! One module per subcommand.

pub mod completions;
pub mod config;
pub mod create;
pub mod list;

use std::path::Path;

use buildtree_adapters::{Project, ProjectLoader};

use crate::error::{CliError, CliResult};

/// Load the project rooted at `root`, reporting a missing manifest as
/// [`CliError::ProjectNotFound`].
pub(crate) fn load_project(root: &Path) -> CliResult<Project> {
    let loader = ProjectLoader::new(root);
    if !loader.manifest_path().is_file() {
        return Err(CliError::ProjectNotFound {
            path: root.to_path_buf(),
        });
    }
    Ok(loader.load()?)
}

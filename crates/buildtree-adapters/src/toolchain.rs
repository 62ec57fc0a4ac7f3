//! Host toolchain: tools looked up on `PATH`, installs run as subprocesses.

use std::{collections::BTreeMap, path::Path, process::Command};

use buildtree_core::{
    application::{ApplicationError, ports::Toolchain},
    domain::{AppConfig, BuildTarget, DomainValidator, PathIndex},
    error::BuildtreeResult,
};
use tracing::{debug, info, instrument};

/// Default requirement installer; the destination directory and the
/// requirements are appended.
pub const DEFAULT_INSTALLER: &[&str] = &[
    "python3",
    "-m",
    "pip",
    "install",
    "--upgrade",
    "--no-user",
    "--target",
];

#[derive(Debug, Clone)]
pub struct HostToolchain {
    /// Tools that must be on `PATH`, per platform.
    required_tools: BTreeMap<String, Vec<String>>,
    installer: Vec<String>,
}

impl Default for HostToolchain {
    fn default() -> Self {
        Self {
            required_tools: BTreeMap::new(),
            installer: DEFAULT_INSTALLER.iter().map(ToString::to_string).collect(),
        }
    }
}

impl HostToolchain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_required_tools(mut self, tools: BTreeMap<String, Vec<String>>) -> Self {
        self.required_tools = tools;
        self
    }

    /// Replace the installer command. An empty command keeps the default.
    pub fn with_installer(mut self, installer: Vec<String>) -> Self {
        if !installer.is_empty() {
            self.installer = installer;
        }
        self
    }

    pub fn installer(&self) -> &[String] {
        &self.installer
    }
}

impl Toolchain for HostToolchain {
    fn verify_app_template(
        &self,
        app: &AppConfig,
        bundle_path: &Path,
        index: &PathIndex,
    ) -> BuildtreeResult<()> {
        let check_failed = |reason: String| ApplicationError::TemplateCheck {
            app: app.app_name().to_string(),
            reason,
        };

        let mut entries = std::fs::read_dir(bundle_path)
            .map_err(|e| check_failed(format!("{}: {}", bundle_path.display(), e)))?;
        if entries.next().is_none() {
            return Err(check_failed("the template produced an empty bundle".into()).into());
        }
        DomainValidator::validate_path_index(index)?;
        Ok(())
    }

    fn verify_app_tools(&self, _app: &AppConfig, target: &BuildTarget) -> BuildtreeResult<()> {
        let Some(tools) = self.required_tools.get(target.platform()) else {
            return Ok(());
        };
        for tool in tools {
            let found = which::which(tool).map_err(|_| ApplicationError::ToolMissing {
                tool: tool.clone(),
            })?;
            debug!(tool, path = %found.display(), "Tool found");
        }
        Ok(())
    }

    #[instrument(skip_all, fields(app = %app.app_name(), count = requires.len()))]
    fn install_requirements(
        &self,
        app: &AppConfig,
        destination: &Path,
        requires: &[String],
    ) -> BuildtreeResult<()> {
        let Some((program, args)) = self.installer.split_first() else {
            return Err(ApplicationError::ToolMissing {
                tool: "installer".into(),
            }
            .into());
        };
        let program = which::which(program).map_err(|_| ApplicationError::ToolMissing {
            tool: program.clone(),
        })?;

        info!(installer = %program.display(), "Running requirement installer");
        let output = Command::new(&program)
            .args(args)
            .arg(destination)
            .args(requires)
            .output()
            .map_err(|e| ApplicationError::ToolFailed {
                tool: program.display().to_string(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(ApplicationError::ToolFailed {
                tool: program.display().to_string(),
                reason: format!(
                    "{}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            }
            .into());
        }
        Ok(())
    }
}

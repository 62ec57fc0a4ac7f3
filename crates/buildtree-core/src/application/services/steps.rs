//! The steps that run after `generate`, one method per step.

use std::{ffi::OsString, path::Path};

use glob::MatchOptions;
use tracing::{debug, info, warn};

use crate::{
    application::{
        ApplicationError,
        services::{CreateService, create_service::Run},
    },
    domain::{AppConfig, DomainError, DomainValidator},
    error::BuildtreeResult,
};

/// Written into `INSTALLER` so other tools know who placed the code.
const INSTALLER_NAME: &str = "buildtree";

const CLEANUP_MATCH: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

impl CreateService {
    pub(crate) fn install_app_support_package(&self, run: &Run<'_>) -> BuildtreeResult<()> {
        let Some(support_path) = run.index.support_path() else {
            debug!("Template declares no support path; nothing to install");
            return Ok(());
        };

        let revision = run.index.support_revision();
        info!(revision, "Installing support package...");
        let package = self.assets.support_package(run.target, revision)?;

        let destination = run.bundle_path.join(support_path);
        if self.filesystem.exists(&destination) {
            self.filesystem.remove_dir_all(&destination)?;
        }
        self.filesystem.copy_tree(&package, &destination)
    }

    pub(crate) fn install_stub_binary(&self, run: &Run<'_>) -> BuildtreeResult<()> {
        let Some(revision) = run.index.stub_binary_revision() else {
            return Ok(());
        };

        info!(revision, "Installing stub binary...");
        let binary = self.assets.stub_binary(run.target, revision)?;
        let path = run.target.binary_path(&run.bundle_path, run.app);
        self.filesystem.write_file(&path, &binary)?;
        self.filesystem.set_permissions(&path, true)
    }

    pub(crate) fn verify_app_template(&self, run: &Run<'_>) -> BuildtreeResult<()> {
        debug!("Verifying application template");
        self.toolchain
            .verify_app_template(run.app, &run.bundle_path, &run.index)
    }

    pub(crate) fn install_app_code(&self, run: &Run<'_>, test_mode: bool) -> BuildtreeResult<()> {
        info!("Installing application code...");
        let app_dir = run.bundle_path.join(run.index.app_path());
        self.recreate_dir(&app_dir)?;

        let sources = run.app.sources_for(test_mode);
        if sources.is_empty() {
            warn!("No sources defined for {}", run.app.app_name());
        }
        for source in sources {
            let from = self.resolve(source);
            if !self.filesystem.exists(&from) {
                return Err(ApplicationError::MissingAppSource { path: from }.into());
            }
            let name = source
                .file_name()
                .ok_or_else(|| DomainError::InvalidSourcePath {
                    path: source.display().to_string(),
                    reason: "has no final component".into(),
                })?;
            debug!(source = %source.display(), "Copying source");
            self.filesystem.copy_tree(&from, &app_dir.join(name))?;
        }

        let dist_info = app_dir.join(format!(
            "{}-{}.dist-info",
            run.app.module_name(),
            run.app.version()
        ));
        self.filesystem.create_dir_all(&dist_info)?;
        self.filesystem
            .write_file(&dist_info.join("INSTALLER"), format!("{INSTALLER_NAME}\n").as_bytes())?;
        self.filesystem
            .write_file(&dist_info.join("METADATA"), metadata(run.app).as_bytes())
    }

    pub(crate) fn install_app_requirements(
        &self,
        run: &Run<'_>,
        test_mode: bool,
    ) -> BuildtreeResult<()> {
        let requires = run.app.requires_for(test_mode);

        if let Some(requirements_path) = run.index.app_requirements_path() {
            info!("Writing requirements file...");
            let path = run.bundle_path.join(requirements_path);
            if let Some(parent) = path.parent() {
                self.filesystem.create_dir_all(parent)?;
            }
            let mut content = requires.join("\n");
            if !content.is_empty() {
                content.push('\n');
            }
            return self.filesystem.write_file(&path, content.as_bytes());
        }

        let packages = run.bundle_path.join(run.index.app_packages_path());
        self.recreate_dir(&packages)?;

        if requires.is_empty() {
            info!("No application requirements.");
            return Ok(());
        }
        info!(count = requires.len(), "Installing app requirements...");
        self.toolchain
            .install_requirements(run.app, &packages, &requires)
    }

    pub(crate) fn install_app_resources(&self, run: &Run<'_>) -> BuildtreeResult<()> {
        if run.index.icon.is_empty() {
            return Ok(());
        }
        let Some(icon) = run.app.icon() else {
            debug!("No icon defined for {}", run.app.app_name());
            return Ok(());
        };

        info!("Installing application resources...");
        for (variant, target) in &run.index.icon {
            let source = self.resolve(&icon_file(icon, variant));
            if !self.filesystem.exists(&source) {
                warn!(
                    "Unable to find {} for {} icon; using default",
                    source.display(),
                    variant
                );
                continue;
            }
            self.filesystem
                .copy_file(&source, &run.bundle_path.join(target))?;
        }
        Ok(())
    }

    pub(crate) fn cleanup_app_content(&self, run: &Run<'_>) -> BuildtreeResult<()> {
        let declared: Vec<String> = run
            .index
            .cleanup_paths
            .iter()
            .chain(run.app.cleanup_paths())
            .cloned()
            .collect();
        if declared.is_empty() {
            return Ok(());
        }

        info!("Removing unneeded app content...");
        let patterns = DomainValidator::validate_cleanup_patterns(&declared)?;
        for relative in self.filesystem.list_tree(&run.bundle_path)? {
            if !patterns
                .iter()
                .any(|p| p.matches_path_with(&relative, CLEANUP_MATCH))
            {
                continue;
            }
            let path = run.bundle_path.join(&relative);
            // An earlier match may already have taken this entry's parent.
            if self.filesystem.exists(&path) {
                debug!(path = %relative.display(), "Removing");
                self.filesystem.remove_path(&path)?;
            }
        }
        Ok(())
    }

    fn recreate_dir(&self, dir: &Path) -> BuildtreeResult<()> {
        if self.filesystem.exists(dir) {
            self.filesystem.remove_dir_all(dir)?;
        }
        self.filesystem.create_dir_all(dir)
    }
}

/// `<icon>-<variant>.png`, next to the icon stem.
fn icon_file(icon: &Path, variant: &str) -> std::path::PathBuf {
    let mut name: OsString = icon.as_os_str().to_owned();
    name.push(format!("-{variant}.png"));
    name.into()
}

fn metadata(app: &AppConfig) -> String {
    let mut lines = vec![
        "Metadata-Version: 2.1".to_string(),
        format!("Buildtree-Version: {}", crate::VERSION),
        format!("Name: {}", app.app_name()),
        format!("Formal-Name: {}", app.formal_name()),
        format!("App-ID: {}", app.bundle_identifier()),
        format!("Version: {}", app.version()),
    ];
    if let Some(author) = app.author() {
        lines.push(format!("Author: {author}"));
    }
    lines.push(format!("Summary: {}", app.description()));
    lines.join("\n") + "\n"
}

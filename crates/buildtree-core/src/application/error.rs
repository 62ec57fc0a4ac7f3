//! Application layer errors.
//!
//! These errors represent failures in orchestration, not validation.
//! Validation errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::{BuildtreeError, ErrorCategory};

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// The app is not supported on the requested platform/format.
    #[error("{app} is not supported on {platform} {format}")]
    UnsupportedPlatform {
        app: String,
        platform: String,
        format: String,
    },

    /// Template rendering failed.
    #[error("Unable to generate the {app} template: {reason}")]
    TemplateRender { app: String, reason: String },

    /// A pipeline step failed; the remaining steps were not run.
    #[error("Step '{step}' failed for {app}: {source}")]
    StepFailed {
        app: String,
        step: &'static str,
        #[source]
        source: Box<BuildtreeError>,
    },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// The persisted path index could not be read or written.
    #[error("Path index error at {path}: {reason}")]
    PathIndexError { path: PathBuf, reason: String },

    /// An app source listed in the app definition does not exist.
    #[error("Application source {path} does not exist")]
    MissingAppSource { path: PathBuf },

    /// A support package or stub binary is not available locally.
    #[error("No {kind} available at {path}")]
    AssetNotFound { kind: &'static str, path: PathBuf },

    /// A required host tool could not be found.
    #[error("Required tool '{tool}' was not found on PATH")]
    ToolMissing { tool: String },

    /// An external tool ran but reported failure.
    #[error("{tool} failed: {reason}")]
    ToolFailed { tool: String, reason: String },

    /// The materialized template does not match its structural contract.
    #[error("Template check failed for {app}: {reason}")]
    TemplateCheck { app: String, reason: String },

    /// Reading user input failed.
    #[error("Console error: {reason}")]
    ConsoleError { reason: String },

    /// Store access failed (lock poisoned, etc.).
    #[error("In-memory store lock poisoned")]
    StoreLockError,

    /// Port/Adapter not configured.
    #[error("Required adapter not configured: {name}")]
    AdapterNotConfigured { name: &'static str },
}

impl ApplicationError {
    /// Wrap a failure from inside a pipeline step.
    pub fn step_failed(app: impl Into<String>, step: &'static str, source: BuildtreeError) -> Self {
        Self::StepFailed {
            app: app.into(),
            step,
            source: Box::new(source),
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::UnsupportedPlatform {
                app,
                platform,
                format,
            } => vec![
                format!("{} declares `supported = false` for {} {}", app, platform, format),
                "Build for a different platform or output format".into(),
            ],
            Self::TemplateRender { .. } => vec![
                "Check that the template directory exists and is readable".into(),
                "Re-run create; the bundle is regenerated from scratch".into(),
            ],
            Self::StepFailed { source, .. } => {
                let mut suggestions = source.suggestions();
                suggestions.push("Re-run create to regenerate the bundle from scratch".into());
                suggestions
            }
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::PathIndexError { path, .. } => vec![
                format!("Check the [paths] table in {}", path.display()),
            ],
            Self::MissingAppSource { path } => vec![
                format!("Create {} or fix the app's `sources`", path.display()),
            ],
            Self::AssetNotFound { kind, path } => vec![
                format!("Place the {} at {}", kind, path.display()),
                "Or point `cache_dir` at a directory that contains it".into(),
            ],
            Self::ToolMissing { tool } => vec![
                format!("Install {} and make sure it is on your PATH", tool),
            ],
            Self::ToolFailed { tool, .. } => vec![
                format!("Check the {} output above for details", tool),
            ],
            Self::StoreLockError => vec![
                "The store is locked".into(),
                "Try again in a moment".into(),
            ],
            Self::AdapterNotConfigured { name } => vec![
                format!("Required component not configured: {}", name),
                "This is likely a configuration error".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnsupportedPlatform { .. } => ErrorCategory::Validation,
            Self::TemplateRender { .. } | Self::TemplateCheck { .. } => ErrorCategory::Template,
            Self::StepFailed { source, .. } => source.category(),
            Self::MissingAppSource { .. } | Self::AssetNotFound { .. } | Self::ToolMissing { .. } => {
                ErrorCategory::NotFound
            }
            Self::PathIndexError { .. } => ErrorCategory::Template,
            Self::AdapterNotConfigured { .. } => ErrorCategory::Configuration,
            Self::FilesystemError { .. }
            | Self::ToolFailed { .. }
            | Self::ConsoleError { .. }
            | Self::StoreLockError => ErrorCategory::Internal,
        }
    }
}

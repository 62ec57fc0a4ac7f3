// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (they travel inside step failures)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("Invalid app name '{name}': {reason}")]
    InvalidAppName { name: String, reason: String },

    #[error("Invalid bundle identifier '{bundle}': {reason}")]
    InvalidBundle { bundle: String, reason: String },

    #[error("Invalid build target '{value}': {reason}")]
    InvalidTarget { value: String, reason: String },

    #[error("Invalid source path '{path}': {reason}")]
    InvalidSourcePath { path: String, reason: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Path escapes the bundle: {path}")]
    PathEscapesBundle { path: String },

    #[error("Invalid cleanup pattern '{pattern}': {reason}")]
    InvalidCleanupPattern { pattern: String, reason: String },

    #[error("Invalid project manifest: {0}")]
    InvalidManifest(String),

    // ========================================================================
    // Constraint Violations
    // ========================================================================
    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidAppName { name, .. } => vec![
                format!("'{}' cannot be used as an app name", name),
                "Start with a letter; use letters, digits, '-' and '_' only".into(),
                "Examples: helloworld, hello-world, hello_world".into(),
            ],
            Self::InvalidBundle { .. } => vec![
                "Use a reverse-domain bundle, e.g. com.example".into(),
                "Each segment must start with a letter".into(),
            ],
            Self::InvalidTarget { .. } => vec![
                "Platform and format are plain identifiers, e.g. `linux system`".into(),
                "Try: buildtree create --help".into(),
            ],
            Self::InvalidSourcePath { path, .. } => vec![
                format!("Check the `sources` entry '{}'", path),
                "Sources are directories relative to the project root".into(),
            ],
            Self::AbsolutePathNotAllowed { .. } | Self::PathEscapesBundle { .. } => vec![
                "The template's bundle.toml declares a path outside the bundle".into(),
                "Fix the [paths] table in the template, then re-run create".into(),
            ],
            Self::InvalidCleanupPattern { pattern, .. } => vec![
                format!("'{}' is not a valid glob", pattern),
                "Patterns use glob syntax, e.g. **/__pycache__".into(),
            ],
            Self::InvalidManifest(_) => vec![
                "Check buildtree.toml in the project root".into(),
                "Every app needs a bundle, a version and at least one source".into(),
            ],
            Self::MissingRequiredField { field } => {
                vec![format!("Add `{}` to the app definition", field)]
            }
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidAppName { .. }
            | Self::InvalidBundle { .. }
            | Self::InvalidTarget { .. }
            | Self::InvalidSourcePath { .. }
            | Self::InvalidCleanupPattern { .. }
            | Self::InvalidManifest(_)
            | Self::MissingRequiredField { .. } => ErrorCategory::Validation,
            Self::AbsolutePathNotAllowed { .. } | Self::PathEscapesBundle { .. } => {
                ErrorCategory::Template
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Template,
    NotFound,
    Internal,
}

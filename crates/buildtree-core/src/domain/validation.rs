use crate::domain::{
    entities::{AppConfig, PathIndex},
    error::DomainError,
};

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across services.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_app(app: &AppConfig) -> Result<(), DomainError> {
        app.validate()
    }

    pub fn validate_path_index(index: &PathIndex) -> Result<(), DomainError> {
        index.validate()
    }

    /// Cleanup globs must be syntactically valid and stay inside the bundle.
    pub fn validate_cleanup_patterns(patterns: &[String]) -> Result<Vec<glob::Pattern>, DomainError> {
        patterns
            .iter()
            .map(|pattern| {
                if pattern.starts_with('/') || pattern.split('/').any(|part| part == "..") {
                    return Err(DomainError::PathEscapesBundle {
                        path: pattern.clone(),
                    });
                }
                glob::Pattern::new(pattern).map_err(|e| DomainError::InvalidCleanupPattern {
                    pattern: pattern.clone(),
                    reason: e.msg.to_string(),
                })
            })
            .collect()
    }
}

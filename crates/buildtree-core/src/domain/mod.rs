// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for buildtree.
//!
//! This module contains pure logic with no I/O. Filesystem, console,
//! rendering and tool concerns are handled via ports (traits) defined in the
//! application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Immutable entities**: All domain objects are Clone + PartialEq
//! - **Rich domain model**: Behavior lives in entities, not services
//!
// Public API - what the world sees
pub mod entities;
pub mod error;
pub mod value_objects;

// Private implementation details - not visible outside domain
mod validation;

// Re-exports for convenience
pub use entities::{
    app::{AppConfig, AppConfigBuilder, License, PlatformOverrides},
    common::RelativePath,
    path_index::{
        DEFAULT_APP_PACKAGES_PATH, DEFAULT_APP_PATH, DEFAULT_SUPPORT_REVISION, PathIndex,
    },
    render_context::RenderContext,
    step::{Step, StepPlan, StepRecord},
    target::{BuildTarget, DEFAULT_BUILD_DIR, ProjectLayout},
};

pub use error::{DomainError, ErrorCategory};

pub use value_objects::{ExecutableNaming, OverwriteDecision, is_affirmative};

pub use validation::DomainValidator;

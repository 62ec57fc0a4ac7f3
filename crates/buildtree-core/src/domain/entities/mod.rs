pub mod app;
pub mod common;
pub mod path_index;
pub mod render_context;
pub mod step;
pub mod target;

pub use crate::domain::DomainError;
pub use app::{AppConfig, AppConfigBuilder, License, PlatformOverrides};
pub use path_index::PathIndex;
pub use render_context::RenderContext;
pub use step::{Step, StepPlan, StepRecord};
pub use target::{BuildTarget, ProjectLayout};

//! Buildtree Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for buildtree, a
//! tool that materializes per-platform application bundles from templates,
//! following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          buildtree-cli (CLI)            │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │            (CreateService)              │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Console, Filesystem, Renderer, Index,  │
//! │        Assets, Toolchain)               │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   buildtree-adapters (Infrastructure)   │
//! │ (LocalFilesystem, DirectoryRenderer...) │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  (AppConfig, BuildTarget, PathIndex,    │
//! │           Step, StepPlan)               │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use buildtree_core::prelude::*;
//!
//! let app = AppConfig::builder("first", "com.example")
//!     .source("src/first")
//!     .build()?;
//! let target = BuildTarget::new("linux", "system")?;
//!
//! // Adapters come from buildtree-adapters (or your own port impls).
//! let service = CreateService::builder(ProjectLayout::new("."))
//!     .default_template("templates/linux-system")
//!     /* .console(..).filesystem(..) ... */
//!     .build()?;
//!
//! let report = service.create_app(&app, &target)?;
//! for step in report.actions() {
//!     println!("{step}");
//! }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        CreateReport, CreateService,
        ports::{AssetProvider, Console, Filesystem, PathIndexStore, TemplateRenderer, Toolchain},
    };
    pub use crate::domain::{
        AppConfig, BuildTarget, License, OverwriteDecision, PathIndex, ProjectLayout,
        RenderContext, Step, StepRecord,
    };
    pub use crate::error::{BuildtreeError, BuildtreeResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

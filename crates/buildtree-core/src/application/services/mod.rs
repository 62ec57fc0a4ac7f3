//! Application services - orchestrate use cases.
//!
//! `CreateService` drives the create pipeline. Its steps live in sibling
//! modules as further `impl CreateService` blocks.

mod confirmation;
pub mod create_service;
mod materializer;
mod steps;

pub use create_service::{CreateReport, CreateService, CreateServiceBuilder};

//! Shared types and models for the CoalWatch fire monitoring platform
//!
//! This crate contains types shared between the monitoring engine and the
//! collaborators that embed it (API servers, CLIs, dashboards).

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;

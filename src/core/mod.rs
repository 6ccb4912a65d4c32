//! Core building blocks shared by every pipeline stage.
//!
//! This module provides the error taxonomy, the pipeline configuration
//! structure, and the run-scoped working-directory context.

pub mod config;
pub mod errors;
pub mod run;

pub use config::PipelineConfig;
pub use errors::{SheetError, SheetResult};
pub use run::RunContext;

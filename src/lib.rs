pub mod config;
pub mod error;
pub mod filtering;
pub mod output;
pub mod pipeline;
pub mod sampling;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use config::PipelineConfig;
pub use error::{AcquisitionError, PipelineError, Result};
pub use pipeline::{Pipeline, PipelineHandle};

//! `callsight-core`: shared building blocks for the insight pipeline.
//!
//! This crate contains **pure** primitives (no IO, no runtime concerns).

pub mod error;
pub mod id;
pub mod value;
pub mod value_object;

pub use error::{DomainError, DomainResult};
pub use id::MetricId;
pub use value::MetricValue;
pub use value_object::ValueObject;

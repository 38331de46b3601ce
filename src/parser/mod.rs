//! Decoded sample stream input.
//!
//! This module handles:
//! - The sample and frame types shared by both processing paths
//! - The pull-based sample source interface
//! - Reading samples from JSON (concatenated or newline-delimited)

pub mod schema;
pub mod source;

// Re-export main types
pub use schema::{Frame, Sample};
pub use source::{drain_samples, JsonSampleReader, SampleSource, VecSampleSource};

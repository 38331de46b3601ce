//! Interning of frames, strings and stacks into per-thread tables.
//!
//! This module builds the compact, deduplicated representation exported as
//! a Gecko profile:
//! - Frame categorization heuristics
//! - Per-thread frame/string/stack tables and the sample timeline
//! - Smoothing of short broken-stack gaps

pub mod category;
pub mod gaps;
pub mod thread;

// Re-export main types and functions
pub use category::{categorize, Category, CategoryRule, CATEGORY_RULES};
pub use gaps::{remove_gaps, remove_stack_gaps, GapHistogram, GapRemoval, GapStats};
pub use thread::{
    is_complete_stack, FrameEntry, FrameId, ProfileBuilder, SampleRecord, StackEntry, StackId,
    StringId, ThreadProfile,
};

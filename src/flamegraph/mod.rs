//! Flamegraph rendering from offset-annotated call trees.
//!
//! This module converts per-thread call trees into interactive SVG
//! flamegraphs, an HTML report bundling them, and text summaries.

pub mod generator;

// Re-export main types
pub use generator::{
    generate_report, generate_text_summary, render_thread_svg, ColorScheme, FlamegraphConfig,
    ReportInfo,
};

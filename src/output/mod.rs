//! Output writers for profile data and flamegraphs.
//!
//! This module handles writing data to disk in various formats:
//! - Gecko profile JSON (Firefox Profiler)
//! - SVG flamegraphs and HTML reports

pub mod gecko;
pub mod json;
pub mod svg;

// Re-export main functions
pub use gecko::{CaptureInfo, GeckoProfile, GeckoThread};
pub use json::{read_gecko_profile, write_gecko_profile};
pub use svg::{write_report, write_svg};

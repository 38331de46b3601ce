//! Perf Trace Studio
//!
//! Turns a decoded stream of CPU profiling samples into:
//! - Merged per-thread call trees laid out as flamegraphs
//! - Gecko profiles (Firefox Profiler) with interned frame, string and
//!   stack tables and a smoothed sample timeline
//!
//! This crate provides the core implementation for the
//! `perf-trace` CLI tool.
//!
//! ## Getting Started
//!
//! ```bash
//! perf-trace flamegraph -i samples.json -o report.html --summary
//! perf-trace gecko -i samples.json -o gecko-profile.json --remove-gaps 3
//! ```

pub mod aggregator;
pub mod commands;
pub mod flamegraph;
pub mod interner;
pub mod output;
pub mod parser;
pub mod utils;

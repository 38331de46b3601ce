//! Sample and frame definitions for the decoded capture stream.
//!
//! Frame identity is the exact `(symbol, module)` pair. Its string form
//! `"<symbol> (in <module>)"` is the key used by the interning tables and the
//! category heuristics, so the formatting must not change.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One call-stack entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Frame {
    /// Symbol (function) name
    #[serde(alias = "symbol_name", alias = "method")]
    pub symbol: String,

    /// Module (DSO) the symbol belongs to
    #[serde(alias = "dso", alias = "dso_name")]
    pub module: String,
}

impl Frame {
    pub fn new(symbol: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            module: module.into(),
        }
    }

    /// Canonical string key, `"<symbol> (in <module>)"`
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (in {})", self.symbol, self.module)
    }
}

/// A single decoded profiling sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub pid: u32,

    pub tid: u32,

    /// Thread name at the time of the sample
    #[serde(default, alias = "comm", alias = "thread_comm")]
    pub thread_name: String,

    /// Sample timestamp in nanoseconds
    #[serde(alias = "timestamp", alias = "time")]
    pub time_ns: u64,

    /// Call stack, root first, leaf last
    #[serde(default)]
    pub frames: Vec<Frame>,
}

impl Sample {
    pub fn new(pid: u32, tid: u32, thread_name: impl Into<String>, time_ns: u64, frames: Vec<Frame>) -> Self {
        Self {
            pid,
            tid,
            thread_name: thread_name.into(),
            time_ns,
            frames,
        }
    }

    /// Timestamp in milliseconds, the unit of the Gecko timeline
    pub fn time_ms(&self) -> f64 {
        self.time_ns as f64 / 1_000_000.0
    }

    /// Canonical frame keys, root first
    pub fn frame_keys(&self) -> Vec<String> {
        self.frames.iter().map(Frame::key).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_key_format() {
        let frame = Frame::new("main", "/system/bin/app");
        assert_eq!(frame.key(), "main (in /system/bin/app)");
    }

    #[test]
    fn test_frame_equality_is_exact() {
        assert_eq!(Frame::new("foo", "libc.so"), Frame::new("foo", "libc.so"));
        assert_ne!(Frame::new("foo", "libc.so"), Frame::new("foo", "libc.so "));
        assert_ne!(Frame::new("Foo", "libc.so"), Frame::new("foo", "libc.so"));
    }

    #[test]
    fn test_sample_aliases() {
        let json = r#"{"pid": 1, "tid": 2, "comm": "RenderThread", "timestamp": 2500000,
                       "frames": [{"symbol_name": "main", "dso_name": "app"}]}"#;
        let sample: Sample = serde_json::from_str(json).unwrap();
        assert_eq!(sample.thread_name, "RenderThread");
        assert_eq!(sample.time_ms(), 2.5);
        assert_eq!(sample.frames[0], Frame::new("main", "app"));
    }

    #[test]
    fn test_sample_without_frames() {
        let sample: Sample = serde_json::from_str(r#"{"pid": 1, "tid": 1, "time_ns": 0}"#).unwrap();
        assert!(sample.frames.is_empty());
        assert!(sample.frame_keys().is_empty());
    }
}

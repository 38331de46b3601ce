//! Gecko profile document, the format read by the Firefox Profiler.
//!
//! Tables are row oriented: each table carries a `schema` mapping column
//! names to positions and a `data` list of rows.
//! Format reference: https://github.com/firefox-devtools/profiler/blob/main/docs-developer/gecko-profile-format.md

use crate::interner::{Category, StackId, StringId, ThreadProfile};
use crate::utils::config::GECKO_PROFILE_VERSION;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// `[stack, time, responsiveness]`
pub type SampleRow = (Option<StackId>, f64, u32);

/// `[location, relevantForJS, innerWindowID, implementation, optimizations,
/// line, column, category, subcategory]`
pub type FrameRow = (
    StringId,
    bool,
    u32,
    Option<String>,
    Option<Value>,
    Option<u32>,
    Option<u32>,
    Category,
    u32,
);

/// `[prefix, frame, category]`
pub type StackRow = (Option<StackId>, usize, u32);

/// A row-oriented table with its column schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table<T> {
    pub schema: BTreeMap<String, usize>,
    pub data: Vec<T>,
}

impl<T> Table<T> {
    fn new(columns: &[&str], data: Vec<T>) -> Self {
        let schema = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.to_string(), i))
            .collect();
        Self { schema, data }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeckoCategory {
    pub name: String,
    pub color: String,
    pub subcategories: Vec<String>,
}

impl From<Category> for GeckoCategory {
    fn from(category: Category) -> Self {
        Self {
            name: category.name().to_string(),
            color: category.color().to_string(),
            subcategories: vec!["Other".to_string()],
        }
    }
}

/// Details about the capture that end up in the profile's `meta` block
#[derive(Debug, Clone, Default)]
pub struct CaptureInfo {
    /// Command line used for the recording
    pub product: Option<String>,
    pub device: Option<String>,
    pub platform: Option<String>,
    pub abi: Option<String>,
    pub app_build_id: Option<String>,
    /// Profile start time, milliseconds since the Unix epoch
    pub start_time_ms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeckoMeta {
    pub interval: f64,
    pub process_type: u32,
    pub product: Option<String>,
    pub device: Option<String>,
    pub platform: Option<String>,
    pub stackwalk: u32,
    pub debug: u32,
    pub gcpoison: u32,
    pub asyncstack: u32,
    pub start_time: f64,
    pub shutdown_time: Option<f64>,
    pub version: u32,
    pub presymbolicated: bool,
    pub categories: Vec<GeckoCategory>,
    pub marker_schema: Vec<Value>,
    pub abi: Option<String>,
    pub oscpu: Option<String>,
    #[serde(rename = "appBuildID")]
    pub app_build_id: Option<String>,
}

impl GeckoMeta {
    pub fn new(info: &CaptureInfo) -> Self {
        Self {
            interval: 1.0,
            process_type: 0,
            product: info.product.clone(),
            device: info.device.clone(),
            platform: info.platform.clone(),
            stackwalk: 1,
            debug: 0,
            gcpoison: 0,
            asyncstack: 1,
            start_time: info.start_time_ms,
            shutdown_time: None,
            version: GECKO_PROFILE_VERSION,
            presymbolicated: true,
            categories: Category::ALL.into_iter().map(GeckoCategory::from).collect(),
            marker_schema: Vec::new(),
            abi: info.abi.clone(),
            oscpu: info.platform.clone(),
            app_build_id: info.app_build_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeckoThread {
    pub tid: u32,
    pub pid: u32,
    pub name: String,
    pub markers: Table<Value>,
    pub samples: Table<SampleRow>,
    pub frame_table: Table<FrameRow>,
    pub stack_table: Table<StackRow>,
    pub string_table: Vec<String>,
    pub register_time: f64,
    pub unregister_time: Option<f64>,
    pub process_type: String,
}

impl GeckoThread {
    pub fn from_profile(thread: &ThreadProfile) -> Self {
        let samples = thread
            .samples
            .iter()
            .map(|s| (s.stack_id, s.time_ms, s.responsiveness))
            .collect();
        let frames = thread
            .frame_table()
            .map(|f| (f.string_id, false, 0, None, None, None, None, f.category, 0))
            .collect();
        let stacks = thread
            .stack_table()
            .map(|s| (s.prefix, s.frame, 0))
            .collect();

        Self {
            tid: thread.tid,
            pid: thread.pid,
            name: thread.comm.clone(),
            markers: Table::new(
                &["name", "startTime", "endTime", "phase", "category", "data"],
                Vec::new(),
            ),
            samples: Table::new(&["stack", "time", "responsiveness"], samples),
            frame_table: Table::new(
                &[
                    "location",
                    "relevantForJS",
                    "innerWindowID",
                    "implementation",
                    "optimizations",
                    "line",
                    "column",
                    "category",
                    "subcategory",
                ],
                frames,
            ),
            stack_table: Table::new(&["prefix", "frame", "category"], stacks),
            string_table: thread.string_table().map(str::to_string).collect(),
            register_time: 0.0,
            unregister_time: None,
            process_type: "default".to_string(),
        }
    }
}

/// Top-level Gecko profile
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeckoProfile {
    pub meta: GeckoMeta,
    pub libs: Vec<Value>,
    pub threads: Vec<GeckoThread>,
    pub processes: Vec<Value>,
    pub paused_ranges: Vec<Value>,
}

impl GeckoProfile {
    /// Build a profile from per-thread tables, in the given order
    pub fn new<'a>(info: &CaptureInfo, threads: impl IntoIterator<Item = &'a ThreadProfile>) -> Self {
        Self {
            meta: GeckoMeta::new(info),
            libs: Vec::new(),
            threads: threads.into_iter().map(GeckoThread::from_profile).collect(),
            processes: Vec::new(),
            paused_ranges: Vec::new(),
        }
    }

    pub fn total_samples(&self) -> usize {
        self.threads.iter().map(|t| t.samples.data.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn thread() -> ThreadProfile {
        let mut thread = ThreadProfile::new("main", 10, 10);
        thread.add_sample("main", &["main (in app)", "read (in [kernel.kallsyms])"], 2.0);
        thread.add_sample::<&str>("main", &[], 3.0);
        thread
    }

    #[test]
    fn test_thread_json_layout() {
        let gecko = GeckoThread::from_profile(&thread());
        let value = serde_json::to_value(&gecko).unwrap();

        assert_eq!(value["name"], "main");
        assert_eq!(value["samples"]["schema"]["time"], 1);
        assert_eq!(value["samples"]["data"], json!([[1, 2.0, 0], [null, 3.0, 0]]));
        assert_eq!(
            value["frameTable"]["data"][1],
            json!([1, false, 0, null, null, null, null, 1, 0])
        );
        assert_eq!(value["stackTable"]["data"], json!([[null, 0, 0], [0, 1, 0]]));
        assert_eq!(value["stringTable"], json!(["main (in app)", "read (in [kernel.kallsyms])"]));
        assert_eq!(value["unregisterTime"], Value::Null);
        assert_eq!(value["processType"], "default");
    }

    #[test]
    fn test_meta_categories() {
        let meta = GeckoMeta::new(&CaptureInfo::default());
        let value = serde_json::to_value(&meta).unwrap();
        assert_eq!(value["version"], 24);
        assert_eq!(value["categories"].as_array().unwrap().len(), 8);
        assert_eq!(value["categories"][5]["name"], "Off-CPU");
        assert_eq!(value["categories"][6]["color"], "grey");
        assert!(value.get("appBuildID").is_some());
    }

    #[test]
    fn test_profile_round_trips_through_json() {
        let profile = GeckoProfile::new(&CaptureInfo::default(), [&thread()]);
        let text = serde_json::to_string(&profile).unwrap();
        let back: GeckoProfile = serde_json::from_str(&text).unwrap();
        assert_eq!(back.total_samples(), 2);
        assert_eq!(back.threads[0].frame_table.data[1].7, Category::Kernel);
        assert!(text.contains("\"pausedRanges\":[]"));
    }
}

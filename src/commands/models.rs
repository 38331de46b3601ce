use crate::flamegraph::FlamegraphConfig;
use crate::utils::config::{DEFAULT_HOT_FRAMES, DEFAULT_MAX_GAP_LENGTH};
use std::path::PathBuf;

/// Arguments for the flamegraph command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct FlamegraphArgs {
    /// Decoded sample stream (`-` for stdin)
    pub input: PathBuf,

    /// Output path for the HTML report
    pub output_html: PathBuf,

    /// Flamegraph configuration
    pub flamegraph_config: FlamegraphConfig,

    /// Frames in the input are ordered leaf first
    pub leaf_first: bool,

    /// Print text summary to stdout
    pub print_summary: bool,

    /// Hot frames listed per thread in the summary
    pub hot_frames: usize,

    /// Recording command line shown in the report header
    pub record_cmd: Option<String>,
}

impl Default for FlamegraphArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from("samples.json"),
            output_html: PathBuf::from("report.html"),
            flamegraph_config: FlamegraphConfig::default(),
            leaf_first: false,
            print_summary: false,
            hot_frames: DEFAULT_HOT_FRAMES,
            record_cmd: None,
        }
    }
}

/// Arguments for the gecko command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct GeckoArgs {
    /// Decoded sample stream (`-` for stdin)
    pub input: PathBuf,

    /// Output path for the Gecko profile JSON
    pub output_json: PathBuf,

    /// Longest run of broken stacks to remove; 0 disables smoothing
    pub max_remove_gap_length: i64,

    /// Frames in the input are ordered leaf first
    pub leaf_first: bool,

    /// Recording command line stored as the profile's product
    pub product: Option<String>,

    /// Target ABI stored in the profile metadata
    pub abi: Option<String>,

    /// Device the capture was recorded on
    pub device: Option<String>,

    /// OS or platform description, also stored as `oscpu`
    pub platform: Option<String>,

    /// Build id of the profiled app
    pub app_build_id: Option<String>,

    /// Capture start, milliseconds since the Unix epoch; defaults to now
    pub start_time_ms: Option<f64>,

    /// Indent the JSON output
    pub pretty: bool,
}

impl Default for GeckoArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from("samples.json"),
            output_json: PathBuf::from("gecko-profile.json"),
            max_remove_gap_length: DEFAULT_MAX_GAP_LENGTH,
            leaf_first: false,
            product: None,
            abi: None,
            device: None,
            platform: None,
            app_build_id: None,
            start_time_ms: None,
            pretty: false,
        }
    }
}

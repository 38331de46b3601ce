//! Perf Trace Studio CLI
//!
//! Generates flamegraph reports and Gecko profiles from decoded
//! CPU sampling captures.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use perf_trace_studio::commands::{
    display_categories, display_version, execute_flamegraph, execute_gecko,
    validate_profile_file, FlamegraphArgs, GeckoArgs,
};
use perf_trace_studio::flamegraph::{ColorScheme, FlamegraphConfig};
use perf_trace_studio::utils::config::{
    DEFAULT_HOT_FRAMES, DEFAULT_MAX_GAP_LENGTH, DEFAULT_SVG_WIDTH,
};

/// Perf Trace Studio - flamegraphs and Gecko profiles from sampling captures
#[derive(Parser, Debug)]
#[command(name = "perf-trace")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Build per-thread call trees and render an HTML flamegraph report
    Flamegraph {
        /// Decoded sample stream (JSON objects, `-` for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for the HTML report
        #[arg(short, long, default_value = "report.html")]
        output: PathBuf,

        /// Color theme: hot=percentage of samples, dso=module name, legacy=method name
        #[arg(short, long, value_enum, default_value_t = ColorScheme::Hot)]
        color: ColorScheme,

        /// Flamegraph width in pixels
        #[arg(short, long, default_value_t = DEFAULT_SVG_WIDTH)]
        width: usize,

        /// Report title
        #[arg(long)]
        title: Option<String>,

        /// Recording command line shown in the report header
        #[arg(long)]
        record_cmd: Option<String>,

        /// Frames in the input are ordered leaf first
        #[arg(long)]
        leaf_first: bool,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,

        /// Number of hot frames per thread in the summary
        #[arg(long, default_value_t = DEFAULT_HOT_FRAMES)]
        hot_frames: usize,
    },

    /// Convert samples to a Gecko profile for the Firefox Profiler
    Gecko {
        /// Decoded sample stream (JSON objects, `-` for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for the Gecko profile JSON
        #[arg(short, long, default_value = "gecko-profile.json")]
        output: PathBuf,

        /// Max length of continuous broken-stack samples to remove (0 disables)
        #[arg(
            long = "remove-gaps",
            value_name = "MAX_GAP_LENGTH",
            default_value_t = DEFAULT_MAX_GAP_LENGTH,
            allow_negative_numbers = true
        )]
        remove_gaps: i64,

        /// Recording command line stored in the profile metadata
        #[arg(long)]
        product: Option<String>,

        /// Target ABI stored in the profile metadata
        #[arg(long)]
        abi: Option<String>,

        /// Device the capture was recorded on
        #[arg(long)]
        device: Option<String>,

        /// OS or platform description of the device
        #[arg(long)]
        platform: Option<String>,

        /// Build id of the profiled app
        #[arg(long)]
        app_build_id: Option<String>,

        /// Capture start, milliseconds since the Unix epoch (defaults to now)
        #[arg(long, value_name = "MILLIS")]
        start_time_ms: Option<f64>,

        /// Frames in the input are ordered leaf first
        #[arg(long)]
        leaf_first: bool,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Validate a Gecko profile JSON file
    Validate {
        /// Path to profile JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display the frame category table
    Categories,

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Flamegraph {
            input,
            output,
            color,
            width,
            title,
            record_cmd,
            leaf_first,
            summary,
            hot_frames,
        } => {
            let mut config = FlamegraphConfig::new()
                .with_width(width)
                .with_color_scheme(color);
            if let Some(title) = title {
                config = config.with_title(title);
            }

            let args = FlamegraphArgs {
                input,
                output_html: output,
                flamegraph_config: config,
                leaf_first,
                print_summary: summary,
                hot_frames,
                record_cmd,
            };
            execute_flamegraph(args)?;
        }

        Commands::Gecko {
            input,
            output,
            remove_gaps,
            product,
            abi,
            device,
            platform,
            app_build_id,
            start_time_ms,
            leaf_first,
            pretty,
        } => {
            let args = GeckoArgs {
                input,
                output_json: output,
                max_remove_gap_length: remove_gaps,
                leaf_first,
                product,
                abi,
                device,
                platform,
                app_build_id,
                start_time_ms,
                pretty,
            };
            execute_gecko(args)?;
        }

        Commands::Validate { file } => {
            validate_profile_file(file)?;
        }

        Commands::Categories => {
            display_categories();
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

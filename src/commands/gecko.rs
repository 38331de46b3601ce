//! Gecko command implementation.
//!
//! The gecko command:
//! 1. Reads the decoded sample stream
//! 2. Interns frames, strings and stacks per thread
//! 3. Sorts each thread's samples by time
//! 4. Removes short gaps of broken stacks
//! 5. Writes the Gecko profile JSON

use super::models::GeckoArgs;
use super::utils::open_samples;
use crate::interner::{remove_stack_gaps, ProfileBuilder};
use crate::output::{write_gecko_profile, CaptureInfo, GeckoProfile};
use crate::parser::{drain_samples, SampleSource};
use crate::utils::error::SourceError;
use anyhow::{Context, Result};
use chrono::Utc;
use log::info;
use std::time::Instant;

/// Execute the gecko command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Unreadable input or a malformed sample (the whole run is aborted)
/// * Negative gap length
/// * File write errors
pub fn execute_gecko(args: GeckoArgs) -> Result<()> {
    let start_time = Instant::now();
    info!("Starting Gecko profile export for: {}", args.input.display());

    info!("Step 1/4: Reading and interning samples...");
    let mut source = open_samples(&args.input, args.leaf_first)?;
    let mut builder = ProfileBuilder::new();
    let count =
        build_thread_profiles(&mut source, &mut builder).context("Failed to read sample stream")?;
    info!("Interned {} samples", count);

    info!("Step 2/4: Sorting samples by time...");
    builder.sort_all();

    info!("Step 3/4: Removing stack gaps...");
    let (profiles, stats) = remove_stack_gaps(builder.into_thread_profiles(), args.max_remove_gap_length)
        .context("Failed to remove stack gaps")?;
    if stats.dropped_threads > 0 {
        info!("Dropped {} threads left without samples", stats.dropped_threads);
    }

    info!("Step 4/4: Writing Gecko profile...");
    let capture_info = CaptureInfo {
        product: args.product.clone(),
        device: args.device.clone(),
        platform: args.platform.clone(),
        abi: args.abi.clone(),
        app_build_id: args.app_build_id.clone(),
        start_time_ms: args
            .start_time_ms
            .unwrap_or_else(|| Utc::now().timestamp_millis() as f64),
    };
    let profile = GeckoProfile::new(&capture_info, profiles.values());
    write_gecko_profile(&profile, &args.output_json, args.pretty)
        .context("Failed to write Gecko profile")?;
    info!("✓ Gecko profile written to: {}", args.output_json.display());

    info!(
        "Gecko export completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Feed every sample of `source` into `builder`
///
/// **Public** - reusable by embedders that bring their own source
pub fn build_thread_profiles<S: SampleSource + ?Sized>(
    source: &mut S,
    builder: &mut ProfileBuilder,
) -> Result<usize, SourceError> {
    drain_samples(source, |sample| builder.add_sample(sample))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::read_gecko_profile;

    const SAMPLES: &str = r#"
        {"pid": 9, "tid": 9, "thread_name": "app", "time_ns": 3000000,
         "frames": [{"symbol": "__libc_init", "module": "libc.so"}, {"symbol": "main", "module": "app"}]}
        {"pid": 9, "tid": 9, "thread_name": "app", "time_ns": 1000000,
         "frames": [{"symbol": "__libc_init", "module": "libc.so"}]}
        {"pid": 9, "tid": 10, "thread_name": "broken", "time_ns": 2000000,
         "frames": [{"symbol": "lost", "module": "app"}]}
    "#;

    fn run(max_remove_gap_length: i64) -> Result<crate::output::GeckoProfile> {
        let temp_dir = tempfile::tempdir().unwrap();
        let input = temp_dir.path().join("samples.json");
        std::fs::write(&input, SAMPLES).unwrap();
        let output = temp_dir.path().join("gecko.json");

        execute_gecko(GeckoArgs {
            input,
            output_json: output.clone(),
            max_remove_gap_length,
            ..Default::default()
        })?;
        Ok(read_gecko_profile(output)?)
    }

    #[test]
    fn test_execute_gecko_sorts_and_smooths() {
        let profile = run(3).unwrap();

        // Thread 10 held a single broken sample and is dropped
        assert_eq!(profile.threads.len(), 1);
        let thread = &profile.threads[0];
        let times: Vec<f64> = thread.samples.data.iter().map(|s| s.1).collect();
        assert_eq!(times, vec![1.0, 3.0]);
    }

    #[test]
    fn test_execute_gecko_without_smoothing() {
        let profile = run(0).unwrap();
        assert_eq!(profile.threads.len(), 2);
    }

    #[test]
    fn test_execute_gecko_records_capture_metadata() {
        let temp_dir = tempfile::tempdir().unwrap();
        let input = temp_dir.path().join("samples.json");
        std::fs::write(&input, SAMPLES).unwrap();
        let output = temp_dir.path().join("gecko.json");

        execute_gecko(GeckoArgs {
            input,
            output_json: output.clone(),
            product: Some("simpleperf record -p 9".to_string()),
            abi: Some("arm64".to_string()),
            device: Some("Pixel 8".to_string()),
            platform: Some("Android 14".to_string()),
            app_build_id: Some("1.2.3".to_string()),
            start_time_ms: Some(1_700_000_000_000.0),
            ..Default::default()
        })
        .unwrap();

        let meta = read_gecko_profile(output).unwrap().meta;
        assert_eq!(meta.device.as_deref(), Some("Pixel 8"));
        assert_eq!(meta.platform.as_deref(), Some("Android 14"));
        assert_eq!(meta.oscpu.as_deref(), Some("Android 14"));
        assert_eq!(meta.app_build_id.as_deref(), Some("1.2.3"));
        assert_eq!(meta.abi.as_deref(), Some("arm64"));
        assert_eq!(meta.start_time, 1_700_000_000_000.0);
    }

    #[test]
    fn test_execute_gecko_rejects_negative_gap() {
        assert!(run(-1).is_err());
    }
}

//! Flamegraph command implementation.
//!
//! The flamegraph command:
//! 1. Reads the decoded sample stream
//! 2. Builds per-thread call trees
//! 3. Assigns layout offsets
//! 4. Renders the HTML report
//! 5. Writes the report (and optionally prints a summary)

use super::models::FlamegraphArgs;
use super::utils::open_samples;
use crate::aggregator::{
    calculate_thread_stats, generate_thread_offsets, CallTreeAggregator, IdAllocator,
};
use crate::flamegraph::{generate_report, generate_text_summary, ReportInfo};
use crate::output::write_report;
use crate::parser::{drain_samples, SampleSource};
use anyhow::{Context, Result};
use chrono::Local;
use log::{debug, info};
use std::time::Instant;

/// Execute the flamegraph command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Unreadable input or a malformed sample (the whole run is aborted)
/// * Report rendering or file write errors
pub fn execute_flamegraph(args: FlamegraphArgs) -> Result<()> {
    let start_time = Instant::now();
    info!("Starting flamegraph report for: {}", args.input.display());

    info!("Step 1/4: Reading samples...");
    let mut source = open_samples(&args.input, args.leaf_first)?;

    info!("Step 2/4: Building call trees...");
    let ids = IdAllocator::new();
    let mut aggregator = CallTreeAggregator::new(&ids);
    let count = build_call_trees(&mut source, &mut aggregator)
        .context("Failed to read sample stream")?;
    info!("Parsed {} callchains", count);
    aggregator.log_summary();

    info!("Step 3/4: Generating offsets...");
    generate_thread_offsets(&mut aggregator);

    info!("Step 4/4: Rendering report...");
    let threads = aggregator.main_thread_first();
    let report_info = ReportInfo {
        process_name: threads.first().map(|t| t.name.clone()),
        pid: aggregator.process_id(),
        date: Local::now().format("%Y-%m-%d (%A) %H:%M:%S").to_string(),
        record_cmd: args.record_cmd.clone(),
    };
    let html = generate_report(&threads, &report_info, &args.flamegraph_config);

    write_report(&html, &args.output_html).context("Failed to write flamegraph report")?;
    info!("✓ Report written to: {}", args.output_html.display());

    if args.print_summary {
        let stats: Vec<_> = threads
            .iter()
            .map(|t| calculate_thread_stats(t, args.hot_frames))
            .collect();
        for s in &stats {
            debug!("{}", s.summary());
        }
        println!("\n{}", "=".repeat(80));
        println!("FLAMEGRAPH SUMMARY");
        println!("{}", "=".repeat(80));
        println!("Samples: {}", aggregator.total_samples());
        println!("Threads: {}", threads.len());
        println!("\n{}", generate_text_summary(&stats, args.hot_frames));
        println!("{}", "=".repeat(80));
    }

    info!(
        "Flamegraph completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Feed every sample of `source` into `aggregator`
///
/// **Public** - reusable by embedders that bring their own source
pub fn build_call_trees<S: SampleSource + ?Sized>(
    source: &mut S,
    aggregator: &mut CallTreeAggregator<'_>,
) -> Result<usize, crate::utils::error::SourceError> {
    drain_samples(source, |sample| aggregator.add_sample(sample))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{Frame, Sample, VecSampleSource};

    #[test]
    fn test_build_call_trees_counts_samples() {
        let mut source = VecSampleSource::new(vec![
            Sample::new(1, 1, "main", 0, vec![Frame::new("main", "app")]),
            Sample::new(1, 2, "worker", 1, vec![]),
        ]);
        let ids = IdAllocator::new();
        let mut aggregator = CallTreeAggregator::new(&ids);

        assert_eq!(build_call_trees(&mut source, &mut aggregator).unwrap(), 2);
        assert_eq!(aggregator.thread_trees().len(), 2);
    }

    #[test]
    fn test_execute_flamegraph_writes_report() {
        let temp_dir = tempfile::tempdir().unwrap();
        let input = temp_dir.path().join("samples.json");
        std::fs::write(
            &input,
            r#"{"pid": 3, "tid": 3, "thread_name": "app", "time_ns": 1, "frames": [{"symbol": "main", "module": "app"}]}"#,
        )
        .unwrap();
        let output = temp_dir.path().join("out/report.html");

        let args = FlamegraphArgs {
            input,
            output_html: output.clone(),
            ..Default::default()
        };
        execute_flamegraph(args).unwrap();

        let html = std::fs::read_to_string(output).unwrap();
        assert!(html.contains("Main Thread 3 (app) (1 samples):"));
    }

    #[test]
    fn test_execute_flamegraph_fails_on_bad_input() {
        let temp_dir = tempfile::tempdir().unwrap();
        let input = temp_dir.path().join("samples.json");
        std::fs::write(&input, "{\"pid\": 1, \"tid\": 1, \"time_ns\": 0} garbage").unwrap();
        let output = temp_dir.path().join("report.html");

        let args = FlamegraphArgs {
            input,
            output_html: output.clone(),
            ..Default::default()
        };
        assert!(execute_flamegraph(args).is_err());
        assert!(!output.exists());
    }
}

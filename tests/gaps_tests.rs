use perf_trace_studio::interner::{remove_gaps, remove_stack_gaps, ProfileBuilder, SampleRecord};
use perf_trace_studio::parser::{Frame, Sample};
use perf_trace_studio::utils::GapError;
use pretty_assertions::assert_eq;

fn timeline(pattern: &str) -> Vec<SampleRecord> {
    pattern
        .chars()
        .enumerate()
        .map(|(i, c)| SampleRecord {
            stack_id: Some(i),
            time_ms: i as f64,
            responsiveness: 0,
            complete_stack: c == 'C',
        })
        .collect()
}

fn pattern_of(samples: &[SampleRecord]) -> String {
    samples
        .iter()
        .map(|s| if s.complete_stack { 'C' } else { 'I' })
        .collect()
}

#[test]
fn test_short_runs_removed_long_runs_kept() {
    let input = timeline("CIICIIIIC");
    let removal = remove_gaps(&input, 3).unwrap();

    assert_eq!(pattern_of(&removal.samples), "CCIIIIC");
    assert_eq!(removal.samples.len(), 7);
    assert_eq!(removal.histogram.into_iter().collect::<Vec<_>>(), vec![(2, 1), (4, 1)]);
}

#[test]
fn test_zero_limit_is_identity() {
    let input = timeline("ICIIC");
    let removal = remove_gaps(&input, 0).unwrap();
    assert_eq!(removal.samples, input);
    assert!(removal.histogram.is_empty());
}

#[test]
fn test_output_is_fixed_point() {
    for pattern in ["CIICIIIIC", "IIICC", "IIIIIIII", "CICICI", ""] {
        let once = remove_gaps(&timeline(pattern), 3).unwrap().samples;
        let twice = remove_gaps(&once, 3).unwrap().samples;
        assert_eq!(once, twice, "pattern {pattern:?}");
    }
}

#[test]
fn test_removed_samples_are_short_incomplete_runs() {
    let input = timeline("IICIIIICIC");
    let kept = remove_gaps(&input, 2).unwrap().samples;
    let kept_ids: Vec<usize> = kept.iter().filter_map(|s| s.stack_id).collect();

    // runs: [0,1] len 2, [3..=6] len 4, [8] len 1
    assert_eq!(kept_ids, vec![2, 3, 4, 5, 6, 7, 9]);
}

#[test]
fn test_negative_limit_rejected() {
    assert_eq!(
        remove_gaps(&timeline("CIC"), -1).unwrap_err(),
        GapError::NegativeMaxGapLen(-1)
    );
}

#[test]
fn test_threads_emptied_by_smoothing_are_dropped() {
    let mut builder = ProfileBuilder::new();
    let broken = vec![Frame::new("lost", "app")];
    let whole = vec![Frame::new("__start_thread", "libc.so"), Frame::new("run", "app")];
    builder.add_sample(&Sample::new(1, 1, "broken", 0, broken.clone()));
    builder.add_sample(&Sample::new(1, 1, "broken", 1, broken));
    builder.add_sample(&Sample::new(1, 2, "ok", 0, whole));

    let (kept, stats) = remove_stack_gaps(builder.into_thread_profiles(), 3).unwrap();

    assert_eq!(kept.keys().copied().collect::<Vec<_>>(), vec![2]);
    assert_eq!(stats.total_samples, 3);
    assert_eq!(stats.removed_samples, 2);
    assert_eq!(stats.dropped_threads, 1);
}

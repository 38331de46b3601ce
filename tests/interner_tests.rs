use perf_trace_studio::commands::build_thread_profiles;
use perf_trace_studio::interner::{Category, ProfileBuilder, ThreadProfile};
use perf_trace_studio::parser::{Frame, Sample, VecSampleSource};
use pretty_assertions::assert_eq;
use std::collections::HashSet;

fn frames(specs: &[(&str, &str)]) -> Vec<Frame> {
    specs.iter().map(|(s, m)| Frame::new(*s, *m)).collect()
}

#[test]
fn test_shared_leaf_different_prefix() {
    let mut builder = ProfileBuilder::new();
    builder.add_sample(&Sample::new(
        1,
        1,
        "main",
        0,
        frames(&[("main", "app"), ("a", "app"), ("leaf", "libc.so")]),
    ));
    builder.add_sample(&Sample::new(
        1,
        1,
        "main",
        1,
        frames(&[("main", "app"), ("b", "app"), ("leaf", "libc.so")]),
    ));

    let thread = &builder.thread_profiles()[&1];
    let first = thread.stack(thread.samples[0].stack_id.unwrap()).unwrap();
    let second = thread.stack(thread.samples[1].stack_id.unwrap()).unwrap();

    assert_eq!(first.frame, second.frame);
    assert_ne!(thread.samples[0].stack_id, thread.samples[1].stack_id);
    assert_ne!(first.prefix, second.prefix);
    // main is shared: 4 frames, 5 stacks
    assert_eq!(thread.frame_table().len(), 4);
    assert_eq!(thread.stack_table().len(), 5);
}

#[test]
fn test_tables_have_unique_keys() {
    let mut thread = ThreadProfile::new("t", 1, 1);
    let stacks: &[&[&str]] = &[
        &["main (in app)", "foo (in app)"],
        &["main (in app)", "foo (in app)"],
        &["main (in app)", "bar (in libx.so)"],
        &["foo (in app)"],
    ];
    for (i, stack) in stacks.iter().enumerate() {
        thread.add_sample("t", stack, i as f64);
    }

    let strings: Vec<&str> = thread.string_table().collect();
    let unique: HashSet<&str> = strings.iter().copied().collect();
    assert_eq!(strings.len(), unique.len());

    let stack_keys: Vec<_> = thread.stack_table().map(|s| (s.prefix, s.frame)).collect();
    let unique_stacks: HashSet<_> = stack_keys.iter().copied().collect();
    assert_eq!(stack_keys.len(), unique_stacks.len());

    assert_eq!(thread.samples[0].stack_id, thread.samples[1].stack_id);
    assert_eq!(thread.frame(2).unwrap().category, Category::Native);
}

#[test]
fn test_ids_are_per_thread() {
    let mut builder = ProfileBuilder::new();
    builder.add_sample(&Sample::new(1, 1, "a", 0, frames(&[("x", "app")])));
    builder.add_sample(&Sample::new(1, 2, "b", 0, frames(&[("y", "app")])));

    let profiles = builder.thread_profiles();
    for (tid, name) in [(1, "x (in app)"), (2, "y (in app)")] {
        let thread = &profiles[&tid];
        assert_eq!(thread.samples[0].stack_id, Some(0));
        assert_eq!(thread.resolve_stack(0), vec![name]);
        assert_eq!(thread.string(0), Some(name));
    }
}

#[test]
fn test_timeline_sorted_by_time() {
    let mut source = VecSampleSource::new(vec![
        Sample::new(1, 1, "t", 3_000_000, frames(&[("c", "app")])),
        Sample::new(1, 1, "t", 1_000_000, frames(&[("a", "app")])),
        Sample::new(1, 1, "t", 2_000_000, vec![]),
    ]);
    let mut builder = ProfileBuilder::new();
    assert_eq!(build_thread_profiles(&mut source, &mut builder).unwrap(), 3);
    builder.sort_all();

    let thread = &builder.thread_profiles()[&1];
    let times: Vec<f64> = thread.samples.iter().map(|s| s.time_ms).collect();
    assert_eq!(times, vec![1.0, 2.0, 3.0]);
    assert_eq!(thread.samples[1].stack_id, None);
}

#[test]
fn test_thread_name_follows_latest_sample() {
    let mut builder = ProfileBuilder::new();
    builder.add_sample(&Sample::new(1, 5, "Thread-5", 0, vec![]));
    builder.add_sample(&Sample::new(1, 5, "HeapTaskDaemon", 1, vec![]));
    assert_eq!(builder.thread_profiles()[&5].comm, "HeapTaskDaemon");
}

#[test]
fn test_empty_stream_yields_no_threads() {
    let mut source = VecSampleSource::new(Vec::new());
    let mut builder = ProfileBuilder::new();
    assert_eq!(build_thread_profiles(&mut source, &mut builder).unwrap(), 0);
    assert!(builder.thread_profiles().is_empty());
}

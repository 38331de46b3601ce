use perf_trace_studio::aggregator::{generate_thread_offsets, CallTreeAggregator, IdAllocator};
use perf_trace_studio::flamegraph::{render_thread_svg, FlamegraphConfig};
use perf_trace_studio::interner::ProfileBuilder;
use perf_trace_studio::output::{
    read_gecko_profile, write_gecko_profile, write_svg, CaptureInfo, GeckoProfile,
};
use perf_trace_studio::parser::{Frame, Sample};
use pretty_assertions::assert_eq;

fn samples() -> Vec<Sample> {
    vec![
        Sample::new(
            7,
            7,
            "app",
            1_000_000,
            vec![Frame::new("__libc_init", "libc.so"), Frame::new("main", "app")],
        ),
        Sample::new(7, 8, "worker", 2_000_000, vec![Frame::new("work", "[kernel.kallsyms]")]),
    ]
}

#[test]
fn test_gecko_profile_written_and_read_back() {
    let mut builder = ProfileBuilder::new();
    for sample in samples() {
        builder.add_sample(&sample);
    }
    builder.sort_all();

    let info = CaptureInfo {
        product: Some("record -p 7".to_string()),
        ..CaptureInfo::default()
    };
    let profile = GeckoProfile::new(&info, builder.thread_profiles().values());

    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("nested").join("gecko.json");
    write_gecko_profile(&profile, &path, true).unwrap();

    let loaded = read_gecko_profile(&path).unwrap();
    assert_eq!(loaded.meta.version, 24);
    assert_eq!(loaded.meta.product.as_deref(), Some("record -p 7"));
    assert_eq!(loaded.threads.len(), 2);
    assert_eq!(loaded.total_samples(), 2);
    assert_eq!(loaded.threads[0].name, "app");
    assert_eq!(
        loaded.threads[0].string_table,
        vec!["__libc_init (in libc.so)", "main (in app)"]
    );
}

#[test]
fn test_thread_svg_written() {
    let ids = IdAllocator::new();
    let mut agg = CallTreeAggregator::new(&ids);
    for sample in samples() {
        agg.add_sample(&sample);
    }
    generate_thread_offsets(&mut agg);

    let svg = render_thread_svg(&agg.thread_trees()[&7], &FlamegraphConfig::new()).unwrap();
    assert!(svg.contains("main"));

    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("app.svg");
    write_svg(&svg, &path).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), svg);
}

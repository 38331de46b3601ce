//! Configuration and constants for the CLI.

/// Default maximum length of a broken-stack run removed by gap smoothing
pub const DEFAULT_MAX_GAP_LENGTH: i64 = 3;

/// Gecko profile format version understood by the Firefox Profiler
pub const GECKO_PROFILE_VERSION: u32 = 24;

// Flamegraph layout
pub const DEFAULT_SVG_WIDTH: usize = 1124;
pub const SVG_NODE_HEIGHT: usize = 17;
pub const SVG_FONT_SIZE: usize = 12;

/// Number of hot frames listed per thread in text summaries
pub const DEFAULT_HOT_FRAMES: usize = 10;

// A stack is complete once the unwinder reached one of these entry points
pub const STACK_ENTRY_SYMBOLS: &[&str] = &["__libc_init", "__start_thread"];

// Substrings used to categorize frames. Kernel symbols come from kallsyms,
// kernel modules are .ko files.
pub const KERNEL_MARKERS: &[&str] = &["kallsyms", ".ko"];
pub const OFF_CPU_ENTRY_PREFIX: &str = "__schedule ";
pub const NATIVE_MARKER: &str = ".so";
pub const DEX_MARKER: &str = ".vdex";
pub const OAT_MARKER: &str = ".oat";
pub const JIT_MARKER: &str = "[JIT app cache]";

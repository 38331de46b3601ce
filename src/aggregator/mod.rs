//! Aggregation of samples into per-thread call trees.
//!
//! This module transforms the decoded sample stream into:
//! - A merged call tree per thread (flamegraph trie)
//! - Layout offsets for proportional rendering
//! - Per-thread statistics and hot frames

pub mod call_tree;
pub mod metrics;
pub mod offsets;

// Re-export main types and functions
pub use call_tree::{CallTreeAggregator, CallTreeNode, IdAllocator, ThreadTree, ROOT_NODE_ID};
pub use metrics::{calculate_thread_stats, HotFrame, ThreadStats};
pub use offsets::{generate_offsets, generate_thread_offsets};

//! Per-thread statistics and hot frames from call trees.
//!
//! Hot frames are the nodes where the most samples ended (self samples).
//! These are the primary targets for optimization.

use super::call_tree::{CallTreeNode, ThreadTree};
use log::debug;

/// A call-tree node ranked by its self samples
#[derive(Debug, Clone, PartialEq)]
pub struct HotFrame {
    pub node_id: u64,
    pub method: String,
    pub module: String,
    pub self_samples: u64,
    /// Share of the thread's samples
    pub percentage: f64,
}

/// Summary statistics for one thread's call tree
#[derive(Debug, Clone)]
pub struct ThreadStats {
    pub tid: u32,
    pub name: String,
    pub num_samples: u64,
    /// Nodes in the tree, excluding the synthetic root
    pub node_count: usize,
    pub max_depth: usize,
    pub hot_frames: Vec<HotFrame>,
}

impl ThreadStats {
    /// Get human-readable summary
    ///
    /// **Public** - for logging and debugging
    pub fn summary(&self) -> String {
        format!(
            "Thread {} ({}) | Samples: {} | Nodes: {} | Max depth: {}",
            self.tid, self.name, self.num_samples, self.node_count, self.max_depth
        )
    }
}

/// Calculate statistics for a thread
///
/// **Public** - main entry point for metrics calculation
///
/// # Arguments
/// * `tree` - Thread call tree from the aggregator
/// * `top_n` - Number of hot frames to return
pub fn calculate_thread_stats(tree: &ThreadTree, top_n: usize) -> ThreadStats {
    debug!("Calculating top {} hot frames for thread {}", top_n, tree.tid);

    let mut frames = Vec::new();
    collect_hot_frames(&tree.root, tree.num_samples, &mut frames);
    // Stable sort keeps pre-order among equal counts
    frames.sort_by(|a, b| b.self_samples.cmp(&a.self_samples));
    frames.truncate(top_n);

    ThreadStats {
        tid: tree.tid,
        name: tree.name.clone(),
        num_samples: tree.num_samples,
        node_count: tree.root.node_count() - 1,
        max_depth: tree.max_depth(),
        hot_frames: frames,
    }
}

/// Pre-order walk collecting every non-root node with self samples
///
/// **Private** - internal helper
fn collect_hot_frames(node: &CallTreeNode, total: u64, out: &mut Vec<HotFrame>) {
    for child in node.children() {
        let self_samples = child.self_samples();
        if self_samples > 0 {
            out.push(HotFrame {
                node_id: child.id,
                method: child.method.clone(),
                module: child.module.clone(),
                self_samples,
                percentage: percentage(self_samples, total),
            });
        }
        collect_hot_frames(child, total, out);
    }
}

fn percentage(part: u64, total: u64) -> f64 {
    if total > 0 {
        (part as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

//! Assign layout offsets to call-tree nodes.
//!
//! Offsets position nodes from different branches side by side: a node's
//! children tile its range `[offset, offset + num_samples)` in insertion
//! order, each child starting where the previous one ended.

use super::call_tree::{CallTreeAggregator, CallTreeNode};

/// Pre-order walk giving `node` the offset `start` and packing its children
pub fn generate_offsets(node: &mut CallTreeNode, start: u64) {
    node.offset = start;
    let mut cursor = start;
    for child in node.children_mut() {
        generate_offsets(child, cursor);
        cursor += child.num_samples;
    }
}

/// Lay out every thread's tree starting at offset 0
pub fn generate_thread_offsets(aggregator: &mut CallTreeAggregator<'_>) {
    for tree in aggregator.thread_trees_mut().values_mut() {
        generate_offsets(&mut tree.root, 0);
    }
}

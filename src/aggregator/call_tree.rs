//! Merge per-thread call stacks into a trie with sample counts.
//!
//! Each thread owns a synthetic root. A sample's frames are walked root
//! first: an existing child with the same `(method, module)` is reused and
//! its count incremented, otherwise a new child is appended. Sibling order is
//! first-seen order and never changes, so rendering is deterministic.

use crate::parser::{Frame, Sample};
use indexmap::IndexMap;
use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};

/// Id of every synthetic root; not a valid navigation target
pub const ROOT_NODE_ID: u64 = 0;

/// Hands out node ids for one report
///
/// Ids start at 1 and are never reused. The counter is atomic so threads may
/// be ingested in parallel against a shared allocator.
#[derive(Debug)]
pub struct IdAllocator {
    next: AtomicU64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(ROOT_NODE_ID + 1),
        }
    }

    pub fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Number of ids handed out so far
    pub fn allocated(&self) -> u64 {
        self.next.load(Ordering::Relaxed) - (ROOT_NODE_ID + 1)
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// One node of a thread's call tree
#[derive(Debug, Clone)]
pub struct CallTreeNode {
    pub id: u64,
    pub method: String,
    pub module: String,
    pub num_samples: u64,
    /// Start of this node's layout range, set by `generate_offsets`
    pub offset: u64,
    children: IndexMap<Frame, CallTreeNode>,
}

impl CallTreeNode {
    fn new(id: u64, method: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            id,
            method: method.into(),
            module: module.into(),
            num_samples: 0,
            offset: 0,
            children: IndexMap::new(),
        }
    }

    fn root() -> Self {
        Self::new(ROOT_NODE_ID, "root", "")
    }

    /// Children in first-seen order
    pub fn children(&self) -> impl ExactSizeIterator<Item = &CallTreeNode> {
        self.children.values()
    }

    pub fn children_mut(&mut self) -> impl ExactSizeIterator<Item = &mut CallTreeNode> {
        self.children.values_mut()
    }

    pub fn child(&self, method: &str, module: &str) -> Option<&CallTreeNode> {
        self.children.get(&Frame::new(method, module))
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Samples that ended in this node rather than one of its children
    pub fn self_samples(&self) -> u64 {
        let child_total: u64 = self.children().map(|c| c.num_samples).sum();
        self.num_samples.saturating_sub(child_total)
    }

    /// Longest path below this node: 0 for a leaf, else 1 + deepest child
    pub fn max_depth(&self) -> usize {
        self.children()
            .map(|c| c.max_depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Number of nodes in this subtree, including this one
    pub fn node_count(&self) -> usize {
        1 + self.children().map(CallTreeNode::node_count).sum::<usize>()
    }

    /// Find the child matching `frame`, counting one more sample through it,
    /// or append a new child with a count of one
    fn descend(&mut self, ids: &IdAllocator, frame: &Frame) -> &mut CallTreeNode {
        let index = match self.children.get_index_of(frame) {
            Some(index) => {
                self.children[index].num_samples += 1;
                index
            }
            None => {
                let mut node = CallTreeNode::new(ids.next_id(), &frame.symbol, &frame.module);
                node.num_samples = 1;
                self.children.insert_full(frame.clone(), node).0
            }
        };
        &mut self.children[index]
    }
}

/// Call tree and bookkeeping for a single thread
#[derive(Debug, Clone)]
pub struct ThreadTree {
    pub pid: u32,
    pub tid: u32,
    /// Most recently seen thread name
    pub name: String,
    /// Every ingested sample, including those without frames
    pub num_samples: u64,
    pub root: CallTreeNode,
}

impl ThreadTree {
    fn new(pid: u32, tid: u32) -> Self {
        Self {
            pid,
            tid,
            name: String::new(),
            num_samples: 0,
            root: CallTreeNode::root(),
        }
    }

    pub fn is_main_thread(&self) -> bool {
        self.pid == self.tid
    }

    pub fn max_depth(&self) -> usize {
        self.root.max_depth()
    }

    /// Append one sample's path, root first
    pub fn add_frames(&mut self, ids: &IdAllocator, frames: &[Frame]) {
        self.num_samples += 1;
        if frames.is_empty() {
            return;
        }

        let mut node = &mut self.root;
        for frame in frames {
            node = node.descend(ids, frame);
        }
        // The root stands for no frame; its count is the sum of its children.
        self.root.num_samples += 1;
    }
}

/// Builds call trees for every thread in a capture
pub struct CallTreeAggregator<'a> {
    ids: &'a IdAllocator,
    threads: IndexMap<u32, ThreadTree>,
}

impl<'a> CallTreeAggregator<'a> {
    pub fn new(ids: &'a IdAllocator) -> Self {
        Self {
            ids,
            threads: IndexMap::new(),
        }
    }

    /// Route a sample to its thread's tree
    pub fn add_sample(&mut self, sample: &Sample) {
        let tree = self
            .threads
            .entry(sample.tid)
            .or_insert_with(|| ThreadTree::new(sample.pid, sample.tid));
        tree.name.clone_from(&sample.thread_name);
        tree.add_frames(self.ids, &sample.frames);
    }

    /// Trees keyed by thread id, in first-seen order
    pub fn thread_trees(&self) -> &IndexMap<u32, ThreadTree> {
        &self.threads
    }

    pub fn thread_trees_mut(&mut self) -> &mut IndexMap<u32, ThreadTree> {
        &mut self.threads
    }

    pub fn into_thread_trees(self) -> IndexMap<u32, ThreadTree> {
        self.threads
    }

    /// Threads whose tid equals their pid first, then the rest
    pub fn main_thread_first(&self) -> Vec<&ThreadTree> {
        let (mut ordered, others): (Vec<_>, Vec<_>) =
            self.threads.values().partition(|t| t.is_main_thread());
        ordered.extend(others);
        ordered
    }

    pub fn total_samples(&self) -> u64 {
        self.threads.values().map(|t| t.num_samples).sum()
    }

    /// Process id of the capture: the main thread's pid, else the first seen
    pub fn process_id(&self) -> Option<u32> {
        self.threads
            .values()
            .find(|t| t.is_main_thread())
            .or_else(|| self.threads.values().next())
            .map(|t| t.pid)
    }

    pub fn log_summary(&self) {
        debug!(
            "Aggregated {} samples into {} thread trees ({} nodes)",
            self.total_samples(),
            self.threads.len(),
            self.ids.allocated()
        );
    }
}

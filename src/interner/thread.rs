//! Per-thread interning tables and sample timeline.
//!
//! Strings, frames and stacks are each deduplicated into an append-only
//! table, so an id handed out for a key never changes. Stacks are interned
//! by `(prefix stack, leaf frame)`, which turns shared call-stack prefixes
//! into a DAG rather than repeating them per sample.

use super::category::{categorize, Category};
use crate::parser::Sample;
use crate::utils::config::STACK_ENTRY_SYMBOLS;
use indexmap::{IndexMap, IndexSet};
use log::debug;

pub type StringId = usize;
pub type FrameId = usize;
pub type StackId = usize;

/// Frame table row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameEntry {
    pub string_id: StringId,
    pub category: Category,
}

/// Stack table row: a leaf frame on top of an optional prefix stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StackEntry {
    pub prefix: Option<StackId>,
    pub frame: FrameId,
}

/// One point of the sample timeline
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRecord {
    /// `None` for a sample without frames
    pub stack_id: Option<StackId>,
    pub time_ms: f64,
    pub responsiveness: u32,
    /// The unwinder reached a process or thread entry point
    pub complete_stack: bool,
}

/// True if any frame names a known process/thread entry point
pub fn is_complete_stack<S: AsRef<str>>(frames: &[S]) -> bool {
    frames.iter().any(|frame| {
        let frame = frame.as_ref();
        STACK_ENTRY_SYMBOLS.iter().any(|entry| frame.contains(entry))
    })
}

/// Interning tables and timeline for a single thread
#[derive(Debug, Clone)]
pub struct ThreadProfile {
    pub comm: String,
    pub pid: u32,
    pub tid: u32,
    pub samples: Vec<SampleRecord>,
    strings: IndexSet<String>,
    frames: IndexMap<String, FrameEntry>,
    stacks: IndexSet<StackEntry>,
}

impl ThreadProfile {
    pub fn new(comm: impl Into<String>, pid: u32, tid: u32) -> Self {
        Self {
            comm: comm.into(),
            pid,
            tid,
            samples: Vec::new(),
            strings: IndexSet::new(),
            frames: IndexMap::new(),
            stacks: IndexSet::new(),
        }
    }

    pub fn intern_string(&mut self, s: &str) -> StringId {
        match self.strings.get_index_of(s) {
            Some(id) => id,
            None => self.strings.insert_full(s.to_string()).0,
        }
    }

    /// Intern a frame string, categorizing it on first sight
    pub fn intern_frame(&mut self, frame: &str) -> FrameId {
        if let Some(id) = self.frames.get_index_of(frame) {
            return id;
        }
        let entry = FrameEntry {
            string_id: self.intern_string(frame),
            category: categorize(frame),
        };
        self.frames.insert_full(frame.to_string(), entry).0
    }

    pub fn intern_stack(&mut self, frame: FrameId, prefix: Option<StackId>) -> StackId {
        self.stacks.insert_full(StackEntry { prefix, frame }).0
    }

    /// Add a timestamped sample, frames root first
    ///
    /// The thread name is replaced by `comm`: threads are often renamed
    /// after they start, and the latest name is the useful one.
    pub fn add_sample<S: AsRef<str>>(&mut self, comm: &str, frames: &[S], time_ms: f64) {
        if self.comm != comm {
            self.comm = comm.to_string();
        }

        let mut prefix = None;
        for frame in frames {
            let frame_id = self.intern_frame(frame.as_ref());
            prefix = Some(self.intern_stack(frame_id, prefix));
        }

        self.samples.push(SampleRecord {
            stack_id: prefix,
            time_ms,
            responsiveness: 0,
            complete_stack: is_complete_stack(frames),
        });
    }

    /// Stable sort of the timeline by time; source order is not monotonic
    pub fn sort_samples(&mut self) {
        self.samples.sort_by(|a, b| a.time_ms.total_cmp(&b.time_ms));
    }

    pub fn string_table(&self) -> impl ExactSizeIterator<Item = &str> {
        self.strings.iter().map(String::as_str)
    }

    pub fn frame_table(&self) -> impl ExactSizeIterator<Item = &FrameEntry> {
        self.frames.values()
    }

    pub fn stack_table(&self) -> impl ExactSizeIterator<Item = &StackEntry> {
        self.stacks.iter()
    }

    pub fn string(&self, id: StringId) -> Option<&str> {
        self.strings.get_index(id).map(String::as_str)
    }

    pub fn frame(&self, id: FrameId) -> Option<&FrameEntry> {
        self.frames.get_index(id).map(|(_, entry)| entry)
    }

    pub fn stack(&self, id: StackId) -> Option<&StackEntry> {
        self.stacks.get_index(id)
    }

    /// Frame strings of a stack, root first
    pub fn resolve_stack(&self, id: StackId) -> Vec<&str> {
        let mut out = Vec::new();
        let mut next = Some(id);
        while let Some(entry) = next.and_then(|id| self.stack(id)) {
            if let Some((frame, _)) = self.frames.get_index(entry.frame) {
                out.push(frame.as_str());
            }
            next = entry.prefix;
        }
        out.reverse();
        out
    }
}

/// Routes samples to per-thread profiles
#[derive(Debug, Default)]
pub struct ProfileBuilder {
    threads: IndexMap<u32, ThreadProfile>,
}

impl ProfileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sample(&mut self, sample: &Sample) {
        let thread = self
            .threads
            .entry(sample.tid)
            .or_insert_with(|| ThreadProfile::new(sample.thread_name.as_str(), sample.pid, sample.tid));
        thread.add_sample(&sample.thread_name, &sample.frame_keys(), sample.time_ms());
    }

    /// Sort every thread's timeline
    pub fn sort_all(&mut self) {
        for thread in self.threads.values_mut() {
            thread.sort_samples();
        }
        debug!("Sorted samples for {} threads", self.threads.len());
    }

    /// Profiles keyed by thread id, in first-seen order
    pub fn thread_profiles(&self) -> &IndexMap<u32, ThreadProfile> {
        &self.threads
    }

    pub fn into_thread_profiles(self) -> IndexMap<u32, ThreadProfile> {
        self.threads
    }
}

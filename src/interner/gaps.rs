//! Removal of short runs of broken call stacks.
//!
//! Ideally every sampled stack reaches a process or thread entry point, but
//! unwinding fails now and then. Short runs of incomplete stacks between
//! complete ones are unwind noise and make the stack chart jagged, so they
//! are dropped. Longer runs are kept: they usually mean a genuinely
//! truncated region rather than noise.

use super::thread::{SampleRecord, ThreadProfile};
use crate::utils::error::GapError;
use indexmap::IndexMap;
use log::{debug, info};
use std::collections::BTreeMap;

/// Run length -> number of runs with that length
pub type GapHistogram = BTreeMap<usize, usize>;

/// Filtered timeline and the run lengths seen while scanning
#[derive(Debug, Clone, PartialEq)]
pub struct GapRemoval {
    pub samples: Vec<SampleRecord>,
    pub histogram: GapHistogram,
}

/// Aggregate counters over every thread
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GapStats {
    pub max_gap_len: usize,
    pub total_samples: usize,
    pub removed_samples: usize,
    pub dropped_threads: usize,
    pub histogram: GapHistogram,
}

impl GapStats {
    pub fn removed_percentage(&self) -> f64 {
        if self.total_samples > 0 {
            self.removed_samples as f64 / self.total_samples as f64 * 100.0
        } else {
            0.0
        }
    }
}

fn validate_max_gap_len(max_gap_len: i64) -> Result<usize, GapError> {
    usize::try_from(max_gap_len).map_err(|_| GapError::NegativeMaxGapLen(max_gap_len))
}

/// Remove every run of incomplete stacks no longer than `max_gap_len`
///
/// `samples` must already be time ordered. A limit of 0 leaves the timeline
/// untouched and reports an empty histogram.
pub fn remove_gaps(samples: &[SampleRecord], max_gap_len: i64) -> Result<GapRemoval, GapError> {
    let max_gap_len = validate_max_gap_len(max_gap_len)?;
    let mut histogram = GapHistogram::new();
    if max_gap_len == 0 {
        return Ok(GapRemoval {
            samples: samples.to_vec(),
            histogram,
        });
    }

    let mut remove = vec![false; samples.len()];
    let mut i = 0;
    while i < samples.len() {
        if samples[i].complete_stack {
            i += 1;
            continue;
        }
        let run = samples[i..]
            .iter()
            .take_while(|s| !s.complete_stack)
            .count();
        *histogram.entry(run).or_insert(0) += 1;
        if run <= max_gap_len {
            remove[i..i + run].fill(true);
        }
        i += run;
    }

    let samples = samples
        .iter()
        .zip(&remove)
        .filter(|(_, removed)| !**removed)
        .map(|(s, _)| s.clone())
        .collect();

    Ok(GapRemoval { samples, histogram })
}

/// Smooth every thread's timeline, dropping threads left without samples
///
/// The interning tables are carried over untouched; only the timelines are
/// replaced by their filtered copies.
pub fn remove_stack_gaps(
    profiles: IndexMap<u32, ThreadProfile>,
    max_gap_len: i64,
) -> Result<(IndexMap<u32, ThreadProfile>, GapStats), GapError> {
    let limit = validate_max_gap_len(max_gap_len)?;
    let mut stats = GapStats {
        max_gap_len: limit,
        total_samples: profiles.values().map(|t| t.samples.len()).sum(),
        ..GapStats::default()
    };
    if limit == 0 {
        return Ok((profiles, stats));
    }

    let mut kept = IndexMap::with_capacity(profiles.len());
    for (tid, mut thread) in profiles {
        let removal = remove_gaps(&thread.samples, max_gap_len)?;
        stats.removed_samples += thread.samples.len() - removal.samples.len();
        for (len, count) in removal.histogram {
            *stats.histogram.entry(len).or_insert(0) += count;
        }

        if removal.samples.is_empty() {
            debug!("Dropping thread {} with no samples left", tid);
            stats.dropped_threads += 1;
            continue;
        }
        thread.samples = removal.samples;
        kept.insert(tid, thread);
    }

    if stats.total_samples != 0 {
        info!(
            "Remove stack gaps with length <= {}. {} ({:.2}%) samples are removed.",
            limit,
            stats.removed_samples,
            stats.removed_percentage()
        );
        debug!(
            "Stack gap length distribution among samples (gap_length: count): {:?}",
            stats.histogram
        );
    }

    Ok((kept, stats))
}

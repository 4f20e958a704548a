//! Active Cue Locator
//!
//! Answers "which cue is showing at time T" during playback. Consecutive
//! queries usually land in the same cue or a neighbor, so the previous
//! answer is used as a hint: a hit on the hint is O(1), a short linear probe
//! covers small steps, and a binary search handles jumps and cold starts.
//!
//! Timings must be sorted by start and non-overlapping.

use serde::{Deserialize, Serialize};

use super::order::sort_chronologically;
use crate::core::captions::Cue;
use crate::core::{CueUuid, TimeSec};

/// Cues probed on each side of the hint before falling back to binary search
const LOCAL_PROBE_LIMIT: usize = 4;

/// Cue timing in seconds, the element of a timing index
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CueTiming {
    pub uuid: CueUuid,
    pub start: TimeSec,
    pub end: TimeSec,
}

impl CueTiming {
    /// Half-open containment: `start <= time < end`
    pub fn contains(&self, time: TimeSec) -> bool {
        self.start <= time && time < self.end
    }
}

/// Builds the timing index for a cue list, in chronological order.
///
/// Cues with unparseable timestamps are left out.
pub fn build_timing_index(cues: &[Cue]) -> Vec<CueTiming> {
    sort_chronologically(cues)
        .iter()
        .map(|c| CueTiming {
            uuid: c.uuid.clone(),
            start: c.start_sec(),
            end: c.end_sec(),
        })
        .filter(|t| t.start.is_finite() && t.end.is_finite())
        .collect()
}

/// Returns the index of the timing containing `time`.
///
/// `hint` is the previous answer (or `None` on the first call / after an
/// edit). Returns `None` for a non-finite time or one that falls in a gap,
/// before the first cue or after the last.
pub fn locate(timings: &[CueTiming], time: TimeSec, hint: Option<usize>) -> Option<usize> {
    if !time.is_finite() || timings.is_empty() {
        return None;
    }

    if let Some(h) = hint.filter(|&h| h < timings.len()) {
        if timings[h].contains(time) {
            return Some(h);
        }
        if let Some(found) = probe(timings, time, h) {
            return found;
        }
    }

    binary_search(timings, time)
}

/// Linear probe away from the hint.
///
/// `Some(result)` is a definitive answer; `None` means the probe ran out and
/// the caller should binary search.
fn probe(timings: &[CueTiming], time: TimeSec, hint: usize) -> Option<Option<usize>> {
    if time >= timings[hint].end {
        let last = (hint + LOCAL_PROBE_LIMIT).min(timings.len() - 1);
        for j in hint + 1..=last {
            if timings[j].contains(time) {
                return Some(Some(j));
            }
            if time < timings[j].start {
                // Between cue j-1's end and cue j's start.
                return Some(None);
            }
        }
        if last == timings.len() - 1 {
            return Some(None);
        }
    } else {
        let first = hint.saturating_sub(LOCAL_PROBE_LIMIT);
        for j in (first..hint).rev() {
            if timings[j].contains(time) {
                return Some(Some(j));
            }
            if time >= timings[j].end {
                return Some(None);
            }
        }
        if first == 0 {
            return Some(None);
        }
    }
    None
}

fn binary_search(timings: &[CueTiming], time: TimeSec) -> Option<usize> {
    let after = timings.partition_point(|t| t.start <= time);
    let candidate = after.checked_sub(1)?;
    timings[candidate].contains(time).then_some(candidate)
}

//! Bulk Time Shift
//!
//! Applies one signed offset to a selected subset of cues, clamped against
//! the immediate unselected neighbors so a shift never pushes a cue across
//! the cue next to it.
//!
//! Neighbor relationships come from list order, which is assumed to match
//! chronological order. The result keeps cue count, order and sequence
//! numbers; only timestamps change.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::core::captions::{seconds_to_time, Cue};
use crate::core::TimeSec;

/// Which edge(s) of each selected cue move
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftMode {
    /// Move start only
    Start,
    /// Move end only
    End,
    /// Move the whole cue
    #[default]
    Both,
}

/// Shifts the cues whose uuid is in `targets` by `offset_sec`.
///
/// A zero or non-finite offset, an empty selection or an empty list returns
/// the input unchanged.
pub fn bulk_shift(
    cues: &[Cue],
    targets: &[&str],
    offset_sec: TimeSec,
    mode: ShiftMode,
) -> Vec<Cue> {
    if offset_sec == 0.0 || !offset_sec.is_finite() || targets.is_empty() || cues.is_empty() {
        return cues.to_vec();
    }

    let selected: HashSet<&str> = targets.iter().copied().collect();
    let is_target = |cue: &Cue| selected.contains(cue.uuid.as_str());

    cues.iter()
        .enumerate()
        .map(|(index, cue)| {
            if !is_target(cue) {
                return cue.clone();
            }

            let (start, end) = (cue.start_sec(), cue.end_sec());
            if !start.is_finite() || !end.is_finite() {
                return cue.clone();
            }

            // Only unselected neighbors constrain the shift.
            let previous = index
                .checked_sub(1)
                .map(|i| &cues[i])
                .filter(|c| !is_target(c));
            let next = cues.get(index + 1).filter(|c| !is_target(c));

            let (new_start, new_end) = match mode {
                ShiftMode::Start => shift_start(start, end, offset_sec, previous),
                ShiftMode::End => shift_end(start, end, offset_sec, next),
                ShiftMode::Both => shift_both(start, end, offset_sec, previous, next),
            };

            Cue {
                start_time: seconds_to_time(new_start),
                end_time: seconds_to_time(new_end),
                ..cue.clone()
            }
        })
        .collect()
}

/// Finite neighbor bound, ignoring malformed timestamps
fn finite(value: TimeSec) -> Option<TimeSec> {
    value.is_finite().then_some(value)
}

fn shift_start(
    start: TimeSec,
    end: TimeSec,
    offset: TimeSec,
    previous: Option<&Cue>,
) -> (TimeSec, TimeSec) {
    let mut new_start = start + offset;

    if offset < 0.0 {
        let lower = previous.and_then(|p| finite(p.end_sec())).unwrap_or(0.0);
        new_start = new_start.max(lower);
    } else {
        new_start = new_start.min(end);
    }

    // Keep the duration when the clamped start overtakes the end.
    let new_end = if new_start > end {
        new_start + (end - start)
    } else {
        end
    };

    (new_start.max(0.0), new_end)
}

fn shift_end(
    start: TimeSec,
    end: TimeSec,
    offset: TimeSec,
    next: Option<&Cue>,
) -> (TimeSec, TimeSec) {
    let mut new_end = end + offset;

    if offset > 0.0 {
        if let Some(upper) = next.and_then(|n| finite(n.start_sec())) {
            new_end = new_end.min(upper);
        }
    }

    (start, new_end.max(start))
}

fn shift_both(
    start: TimeSec,
    end: TimeSec,
    offset: TimeSec,
    previous: Option<&Cue>,
    next: Option<&Cue>,
) -> (TimeSec, TimeSec) {
    let lower = previous
        .and_then(|p| finite(p.end_sec()))
        .map_or(-start, |prev_end| prev_end - start);
    let upper = next
        .and_then(|n| finite(n.start_sec()))
        .map_or(TimeSec::INFINITY, |next_start| next_start - end);

    // Bounds may cross when neighbors already overlap; the upper bound wins.
    let effective = offset.max(lower).min(upper);

    ((start + effective).max(0.0), end + effective)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_cues() -> Vec<Cue> {
        vec![
            Cue::new(1, "00:00:00,000", "00:00:02,000", "one").with_uuid("s1"),
            Cue::new(2, "00:00:03,000", "00:00:05,000", "two").with_uuid("s2"),
            Cue::new(3, "00:00:06,000", "00:00:08,000", "three").with_uuid("s3"),
        ]
    }

    fn timings(cues: &[Cue]) -> Vec<(&str, &str)> {
        cues.iter()
            .map(|c| (c.start_time.as_str(), c.end_time.as_str()))
            .collect()
    }

    // -------------------------------------------------------------------------
    // Start mode
    // -------------------------------------------------------------------------

    #[test]
    fn test_shift_start_forward() {
        let next = bulk_shift(&base_cues(), &["s1", "s2"], 1.0, ShiftMode::Start);
        assert_eq!(
            timings(&next),
            vec![
                ("00:00:01,000", "00:00:02,000"),
                ("00:00:04,000", "00:00:05,000"),
                ("00:00:06,000", "00:00:08,000"),
            ]
        );
    }

    #[test]
    fn test_shift_start_forward_clamps_to_own_end() {
        let next = bulk_shift(&base_cues(), &["s2"], 10.0, ShiftMode::Start);
        assert_eq!(timings(&next)[1], ("00:00:05,000", "00:00:05,000"));
    }

    #[test]
    fn test_shift_start_backward_clamps_to_unselected_previous() {
        let next = bulk_shift(&base_cues(), &["s2"], -2.5, ShiftMode::Start);
        assert_eq!(timings(&next)[1], ("00:00:02,000", "00:00:05,000"));
    }

    #[test]
    fn test_shift_start_backward_ignores_selected_previous() {
        let next = bulk_shift(&base_cues(), &["s1", "s2"], -2.5, ShiftMode::Start);
        assert_eq!(timings(&next)[0], ("00:00:00,000", "00:00:02,000"));
        assert_eq!(timings(&next)[1], ("00:00:00,500", "00:00:05,000"));
    }

    #[test]
    fn test_shift_start_preserves_duration_when_pushed_past_end() {
        // Previous cue overlaps past this cue's end.
        let cues = vec![
            Cue::new(1, "00:00:00,000", "00:00:06,000", "long").with_uuid("a"),
            Cue::new(2, "00:00:03,000", "00:00:04,000", "short").with_uuid("b"),
        ];
        let next = bulk_shift(&cues, &["b"], -1.0, ShiftMode::Start);
        assert_eq!(timings(&next)[1], ("00:00:06,000", "00:00:07,000"));
    }

    // -------------------------------------------------------------------------
    // End mode
    // -------------------------------------------------------------------------

    #[test]
    fn test_shift_end_backward_floors_at_start() {
        let next = bulk_shift(&base_cues(), &["s2"], -3.0, ShiftMode::End);
        assert_eq!(timings(&next)[1], ("00:00:03,000", "00:00:03,000"));
    }

    #[test]
    fn test_shift_end_forward_clamps_to_unselected_next() {
        let next = bulk_shift(&base_cues(), &["s2"], 5.0, ShiftMode::End);
        assert_eq!(timings(&next)[1], ("00:00:03,000", "00:00:06,000"));
    }

    #[test]
    fn test_shift_end_forward_unbounded_when_next_selected_or_absent() {
        let next = bulk_shift(&base_cues(), &["s2", "s3"], 5.0, ShiftMode::End);
        assert_eq!(timings(&next)[1], ("00:00:03,000", "00:00:10,000"));
        assert_eq!(timings(&next)[2], ("00:00:06,000", "00:00:13,000"));
    }

    // -------------------------------------------------------------------------
    // Both mode
    // -------------------------------------------------------------------------

    #[test]
    fn test_shift_both_moves_selected_block() {
        let next = bulk_shift(&base_cues(), &["s2", "s3"], 2.0, ShiftMode::Both);
        assert_eq!(
            timings(&next),
            vec![
                ("00:00:00,000", "00:00:02,000"),
                ("00:00:05,000", "00:00:07,000"),
                ("00:00:08,000", "00:00:10,000"),
            ]
        );
        assert_eq!(
            next.iter().map(|c| c.uuid.as_str()).collect::<Vec<_>>(),
            vec!["s1", "s2", "s3"]
        );
    }

    #[test]
    fn test_shift_both_clamps_against_neighbors() {
        let next = bulk_shift(&base_cues(), &["s2"], 5.0, ShiftMode::Both);
        assert_eq!(timings(&next)[1], ("00:00:04,000", "00:00:06,000"));

        let next = bulk_shift(&base_cues(), &["s2"], -5.0, ShiftMode::Both);
        assert_eq!(timings(&next)[1], ("00:00:02,000", "00:00:04,000"));
    }

    #[test]
    fn test_shift_both_floors_at_zero() {
        let next = bulk_shift(&base_cues(), &["s1"], -10.0, ShiftMode::Both);
        assert_eq!(timings(&next)[0], ("00:00:00,000", "00:00:02,000"));
    }

    // -------------------------------------------------------------------------
    // No-ops
    // -------------------------------------------------------------------------

    #[test]
    fn test_shift_noops() {
        let cues = base_cues();
        assert_eq!(bulk_shift(&cues, &["s1"], 0.0, ShiftMode::Both), cues);
        assert_eq!(bulk_shift(&cues, &[], 1.0, ShiftMode::Both), cues);
        assert_eq!(bulk_shift(&cues, &["s1"], f64::NAN, ShiftMode::Both), cues);
        assert!(bulk_shift(&[], &["s1"], 1.0, ShiftMode::Both).is_empty());
    }

    #[test]
    fn test_shift_keeps_sequence_numbers() {
        let mut cues = base_cues();
        cues.swap(0, 2);
        let next = bulk_shift(&cues, &["s1"], 1.0, ShiftMode::Both);
        assert_eq!(next.iter().map(|c| c.id).collect::<Vec<_>>(), vec![3, 2, 1]);
    }
}

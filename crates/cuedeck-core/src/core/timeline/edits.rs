//! Cue Algebra
//!
//! Pure structural edits over a cue list. Every function takes the list by
//! reference and returns a new list with sequence numbers renumbered
//! `1..N`; inputs are never mutated.
//!
//! Edits that cannot proceed (unknown id, split point on a boundary) return
//! an identical copy of the input so callers can invoke them speculatively.

use crate::core::captions::{is_valid_time, renumber, seconds_to_time, time_to_seconds, Cue};
use crate::core::{new_cue_uuid, CoreError, CoreResult, TimeSec, DEFAULT_CUE_DURATION_SEC};

fn position(cues: &[Cue], uuid: &str) -> Option<usize> {
    cues.iter().position(|c| c.uuid == uuid)
}

/// Splits `text` at a char index (clamped to the text length)
fn split_at_char(text: &str, char_index: usize) -> (&str, &str) {
    let byte_index = text
        .char_indices()
        .nth(char_index)
        .map_or(text.len(), |(b, _)| b);
    text.split_at(byte_index)
}

fn renumbered(mut cues: Vec<Cue>) -> Vec<Cue> {
    renumber(&mut cues);
    cues
}

// =============================================================================
// Add / Delete
// =============================================================================

/// Inserts a new cue right after `before_id`.
///
/// The new cue starts where `before_id` ends. With an `after_id` it ends
/// where that cue starts, filling the gap; without one it lasts
/// [`DEFAULT_CUE_DURATION_SEC`].
pub fn add_cue(cues: &[Cue], before_id: &str, after_id: Option<&str>, text: &str) -> Vec<Cue> {
    add_cue_with_duration(cues, before_id, after_id, text, DEFAULT_CUE_DURATION_SEC)
}

/// [`add_cue`] with a configurable duration for appended cues
pub fn add_cue_with_duration(
    cues: &[Cue],
    before_id: &str,
    after_id: Option<&str>,
    text: &str,
    default_duration: TimeSec,
) -> Vec<Cue> {
    let Some(index) = position(cues, before_id) else {
        return cues.to_vec();
    };
    let before = &cues[index];

    let end_time = match after_id.and_then(|id| cues.iter().find(|c| c.uuid == id)) {
        Some(after) => after.start_time.clone(),
        None => seconds_to_time(before.end_sec() + default_duration),
    };

    let mut cue = Cue::new(0, &before.end_time, &end_time, text);
    cue.track_id = before.track_id.clone();

    let mut next = cues.to_vec();
    next.insert(index + 1, cue);
    renumbered(next)
}

/// Removes a cue and renumbers the rest
pub fn delete_cue(cues: &[Cue], id: &str) -> Vec<Cue> {
    if position(cues, id).is_none() {
        return cues.to_vec();
    }
    renumbered(cues.iter().filter(|c| c.uuid != id).cloned().collect())
}

// =============================================================================
// Merge / Split
// =============================================================================

/// Merges two cues into one spanning `first.start` to `second.end`.
///
/// Texts are concatenated with no separator. The merged cue keeps the first
/// cue's uuid and position; the second cue's uuid is dropped.
pub fn merge_cues(cues: &[Cue], first_id: &str, second_id: &str) -> Vec<Cue> {
    let (Some(first), Some(second)) = (position(cues, first_id), position(cues, second_id)) else {
        return cues.to_vec();
    };
    if first == second {
        return cues.to_vec();
    }

    let merged = Cue {
        end_time: cues[second].end_time.clone(),
        text: format!("{}{}", cues[first].text, cues[second].text),
        ..cues[first].clone()
    };

    let next = cues
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != second)
        .map(|(i, c)| if i == first { merged.clone() } else { c.clone() })
        .collect();
    renumbered(next)
}

/// Splits a cue at a caret position within its text.
///
/// The split time divides the cue's duration in the ratio
/// `caret_position / text_length`. The first half keeps the uuid; the second
/// half gets a fresh one. Carets at either edge of the text are a no-op.
pub fn split_cue(cues: &[Cue], id: &str, caret_position: usize, text_length: usize) -> Vec<Cue> {
    if caret_position == 0 || caret_position >= text_length {
        return cues.to_vec();
    }
    let Some(index) = position(cues, id) else {
        return cues.to_vec();
    };

    let cue = &cues[index];
    let (start, end) = (cue.start_sec(), cue.end_sec());
    if !start.is_finite() || !end.is_finite() {
        return cues.to_vec();
    }

    let ratio = caret_position as f64 / text_length as f64;
    let split_time = seconds_to_time(start + ratio * (end - start));
    let (head, tail) = split_at_char(&cue.text, caret_position);

    let first = Cue {
        end_time: split_time.clone(),
        text: head.to_string(),
        ..cue.clone()
    };
    let second = Cue {
        uuid: new_cue_uuid(),
        start_time: split_time,
        text: tail.to_string(),
        ..cue.clone()
    };

    let mut next = cues.to_vec();
    next[index] = first;
    next.insert(index + 1, second);
    renumbered(next)
}

/// Splits a cue at an absolute time.
///
/// The text is divided at the char index proportional to where `time_sec`
/// falls in the cue; markup counts toward the length, so a split may land
/// inside a tag. Each half is trimmed, and a half left empty takes
/// `placeholder`. Times outside the open interval `(start, end)` are a no-op.
pub fn split_cue_at_time(cues: &[Cue], id: &str, time_sec: TimeSec, placeholder: &str) -> Vec<Cue> {
    if !time_sec.is_finite() {
        return cues.to_vec();
    }
    let Some(index) = position(cues, id) else {
        return cues.to_vec();
    };

    let cue = &cues[index];
    let (start, end) = (cue.start_sec(), cue.end_sec());
    if !(start < time_sec && time_sec < end) {
        return cues.to_vec();
    }

    let ratio = (time_sec - start) / (end - start);
    let text_len = cue.text_len();
    let split_index = ((ratio * text_len as f64).round() as usize).min(text_len);
    let (head, tail) = split_at_char(&cue.text, split_index);

    let or_placeholder = |s: &str| {
        let s = s.trim();
        if s.is_empty() {
            placeholder.to_string()
        } else {
            s.to_string()
        }
    };

    let split_time = seconds_to_time(time_sec);
    let first = Cue {
        end_time: split_time.clone(),
        text: or_placeholder(head),
        ..cue.clone()
    };
    let second = Cue {
        uuid: new_cue_uuid(),
        start_time: split_time,
        text: or_placeholder(tail),
        ..cue.clone()
    };

    let mut next = cues.to_vec();
    next[index] = first;
    next.insert(index + 1, second);
    renumbered(next)
}

// =============================================================================
// Field Edits
// =============================================================================

/// Replaces a cue's text
pub fn update_cue_text(cues: &[Cue], id: &str, text: &str) -> Vec<Cue> {
    cues.iter()
        .map(|c| {
            if c.uuid == id {
                Cue {
                    text: text.to_string(),
                    ..c.clone()
                }
            } else {
                c.clone()
            }
        })
        .collect()
}

/// Checks a timing edit: both timestamps canonical and `start <= end`.
pub fn validate_timing(start_time: &str, end_time: &str) -> CoreResult<(TimeSec, TimeSec)> {
    for ts in [start_time, end_time] {
        if !is_valid_time(ts) {
            return Err(CoreError::InvalidTimeFormat(ts.to_string()));
        }
    }
    let (start, end) = (time_to_seconds(start_time), time_to_seconds(end_time));
    if start > end {
        return Err(CoreError::InvalidTimeRange(start, end));
    }
    Ok((start, end))
}

/// Replaces a cue's timing after validation. Nothing changes on error.
pub fn update_cue_timing(
    cues: &[Cue],
    id: &str,
    start_time: &str,
    end_time: &str,
) -> CoreResult<Vec<Cue>> {
    validate_timing(start_time, end_time)?;
    if position(cues, id).is_none() {
        return Err(CoreError::CueNotFound(id.to_string()));
    }

    Ok(cues
        .iter()
        .map(|c| {
            if c.uuid == id {
                Cue {
                    start_time: start_time.to_string(),
                    end_time: end_time.to_string(),
                    ..c.clone()
                }
            } else {
                c.clone()
            }
        })
        .collect())
}

// =============================================================================
// Tests
// =============================================================================

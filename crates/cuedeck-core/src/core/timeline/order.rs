//! Chronological Ordering
//!
//! Sorts a cue list by `(start, end, sequence number, uuid)`. Sequence
//! numbers travel with their cues; sorting never renumbers.

use std::borrow::Cow;
use std::cmp::Ordering;

use crate::core::captions::Cue;

/// Total order used for chronological sorting
pub fn chronological_cmp(a: &Cue, b: &Cue) -> Ordering {
    a.start_sec()
        .total_cmp(&b.start_sec())
        .then_with(|| a.end_sec().total_cmp(&b.end_sec()))
        .then_with(|| a.id.cmp(&b.id))
        .then_with(|| a.uuid.cmp(&b.uuid))
}

/// Returns true if the list is already in chronological order
pub fn is_chronological(cues: &[Cue]) -> bool {
    cues.windows(2)
        .all(|pair| chronological_cmp(&pair[0], &pair[1]) != Ordering::Greater)
}

/// Sorts cues chronologically.
///
/// An already-sorted list comes back as [`Cow::Borrowed`] pointing at the
/// input slice, so callers can skip downstream recomputation. Otherwise a new
/// vector holding the same cues (not renumbered) is returned.
pub fn sort_chronologically(cues: &[Cue]) -> Cow<'_, [Cue]> {
    if is_chronological(cues) {
        return Cow::Borrowed(cues);
    }

    let mut sorted = cues.to_vec();
    sorted.sort_by(chronological_cmp);
    Cow::Owned(sorted)
}

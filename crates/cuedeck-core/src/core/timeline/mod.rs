//! Timeline Module
//!
//! Pure operations over a track's cue list:
//! - Cue algebra (add, delete, merge, split, field edits)
//! - Bulk time shift with neighbor clamping
//! - Chronological sorting
//! - Hinted active-cue lookup for playback
//!
//! None of these touch history; the session commits their results.

mod edits;
mod locator;
mod order;
mod shift;

pub use edits::{
    add_cue, add_cue_with_duration, delete_cue, merge_cues, split_cue, split_cue_at_time,
    update_cue_text, update_cue_timing, validate_timing,
};
pub use locator::{build_timing_index, locate, CueTiming};
pub use order::{chronological_cmp, is_chronological, sort_chronologically};
pub use shift::{bulk_shift, ShiftMode};

//! CueDeck Core Type Definitions
//!
//! Defines fundamental types used throughout the project.

use serde::{Deserialize, Serialize};

// =============================================================================
// ID Types
// =============================================================================

/// Cue stable identity (UUID v4)
pub type CueUuid = String;

/// Track unique identifier (ULID)
pub type TrackId = String;

/// Operation unique identifier (ULID)
pub type OpId = String;

// =============================================================================
// Time Types
// =============================================================================

/// Time in seconds (floating point)
pub type TimeSec = f64;

/// Canonical zero timestamp
pub const ZERO_TIMESTAMP: &str = "00:00:00,000";

/// Duration given to a cue appended at the end of a list
pub const DEFAULT_CUE_DURATION_SEC: TimeSec = 3.0;

/// Hard cap on tracks held by one session
pub const MAX_TRACKS: usize = 4;

/// Generates a fresh cue identity
pub fn new_cue_uuid() -> CueUuid {
    uuid::Uuid::new_v4().to_string()
}

/// Generates a fresh track identifier
pub fn new_track_id() -> TrackId {
    ulid::Ulid::new().to_string()
}

// =============================================================================
// Time Range
// =============================================================================

/// Time range in seconds
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    pub start_sec: TimeSec,
    pub end_sec: TimeSec,
}

impl TimeRange {
    pub fn new(start_sec: TimeSec, end_sec: TimeSec) -> Self {
        Self { start_sec, end_sec }
    }

    /// Returns duration in seconds
    pub fn duration(&self) -> TimeSec {
        self.end_sec - self.start_sec
    }

    /// Half-open containment: `start <= time < end`
    pub fn contains(&self, time: TimeSec) -> bool {
        time >= self.start_sec && time < self.end_sec
    }

    /// Checks if two ranges overlap
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start_sec < other.end_sec && self.end_sec > other.start_sec
    }
}

//! Caption Data Models
//!
//! Defines the cue and track structures edited by the timeline engine.
//!
//! # Overview
//!
//! - A [`Cue`] carries its timing as canonical text (`HH:MM:SS,mmm`), so
//!   edits and exports never accumulate float drift.
//! - A [`Track`] owns an ordered cue list; list position is the source of
//!   truth for neighbor relationships.
//! - [`DocumentMetadata`] preserves WebVTT header and prologue blocks so a
//!   re-export reproduces them.

use serde::{Deserialize, Serialize};

use super::timecode::{seconds_to_time, time_to_seconds};
use crate::core::{new_cue_uuid, new_track_id, CueUuid, TimeRange, TimeSec, TrackId};

// =============================================================================
// Cue
// =============================================================================

/// A single timed caption entry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cue {
    /// Sequence number, dense `1..N` in list order
    pub id: u32,
    /// Stable identity
    pub uuid: CueUuid,
    /// Start timestamp (`HH:MM:SS,mmm`)
    pub start_time: String,
    /// End timestamp (`HH:MM:SS,mmm`)
    pub end_time: String,
    /// Caption text, inline markup kept verbatim
    pub text: String,
    /// Owning track back-reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_id: Option<TrackId>,
}

impl Cue {
    /// Creates a cue with a fresh uuid
    pub fn new(id: u32, start_time: &str, end_time: &str, text: &str) -> Self {
        Self {
            id,
            uuid: new_cue_uuid(),
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
            text: text.to_string(),
            track_id: None,
        }
    }

    /// Creates a cue from second offsets
    pub fn from_seconds(id: u32, start_sec: TimeSec, end_sec: TimeSec, text: &str) -> Self {
        Self::new(id, &seconds_to_time(start_sec), &seconds_to_time(end_sec), text)
    }

    /// Replaces the uuid (fixtures and hydration)
    pub fn with_uuid(mut self, uuid: &str) -> Self {
        self.uuid = uuid.to_string();
        self
    }

    pub fn start_sec(&self) -> TimeSec {
        time_to_seconds(&self.start_time)
    }

    pub fn end_sec(&self) -> TimeSec {
        time_to_seconds(&self.end_time)
    }

    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start_sec(), self.end_sec())
    }

    /// Returns the duration of this cue in seconds
    pub fn duration(&self) -> TimeSec {
        self.end_sec() - self.start_sec()
    }

    /// Half-open visibility test
    pub fn is_visible_at(&self, time_sec: TimeSec) -> bool {
        self.range().contains(time_sec)
    }

    /// Text length in chars, the unit used for caret positions
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Renumbers sequence ids to `1..N` in list order.
pub fn renumber(cues: &mut [Cue]) {
    for (index, cue) in cues.iter_mut().enumerate() {
        cue.id = index as u32 + 1;
    }
}

/// Points every cue's back-reference at `track_id`.
pub fn assign_track(cues: &mut [Cue], track_id: &str) {
    for cue in cues.iter_mut() {
        if cue.track_id.as_deref() != Some(track_id) {
            cue.track_id = Some(track_id.to_string());
        }
    }
}

// =============================================================================
// Document Metadata
// =============================================================================

/// WebVTT header and prologue captured at load time
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    /// Header line(s), e.g. `WEBVTT - Episode 1`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_line: Option<String>,
    /// NOTE/STYLE/REGION blocks preceding the first cue
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prologue_blocks: Vec<String>,
}

impl DocumentMetadata {
    pub fn is_empty(&self) -> bool {
        self.header_line.is_none() && self.prologue_blocks.is_empty()
    }
}

// =============================================================================
// Track
// =============================================================================

/// An ordered cue list representing one subtitle language/version
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Unique identifier
    pub id: TrackId,
    /// Display name (not unique)
    pub name: String,
    /// Cues in list order
    pub subtitles: Vec<Cue>,
    /// WebVTT header captured from the source document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_line: Option<String>,
    /// WebVTT prologue blocks captured from the source document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prologue_blocks: Option<Vec<String>>,
}

impl Track {
    /// Creates a track with the given id; cues are re-owned by it
    pub fn new(id: &str, name: &str, mut subtitles: Vec<Cue>) -> Self {
        assign_track(&mut subtitles, id);
        Self {
            id: id.to_string(),
            name: name.to_string(),
            subtitles,
            header_line: None,
            prologue_blocks: None,
        }
    }

    /// Creates a track with auto-generated ID
    pub fn create(name: &str, subtitles: Vec<Cue>) -> Self {
        Self::new(&new_track_id(), name, subtitles)
    }

    /// Attaches WebVTT metadata
    pub fn with_metadata(mut self, metadata: DocumentMetadata) -> Self {
        self.header_line = metadata.header_line;
        self.prologue_blocks = if metadata.prologue_blocks.is_empty() {
            None
        } else {
            Some(metadata.prologue_blocks)
        };
        self
    }

    /// Returns the WebVTT metadata used for export
    pub fn metadata(&self) -> DocumentMetadata {
        DocumentMetadata {
            header_line: self.header_line.clone(),
            prologue_blocks: self.prologue_blocks.clone().unwrap_or_default(),
        }
    }

    /// Gets a cue by uuid
    pub fn get_cue(&self, uuid: &str) -> Option<&Cue> {
        self.subtitles.iter().find(|c| c.uuid == uuid)
    }

    /// Returns the end of the last-ending cue
    pub fn duration(&self) -> TimeSec {
        self.subtitles
            .iter()
            .map(Cue::end_sec)
            .filter(|s| s.is_finite())
            .fold(0.0, f64::max)
    }

    /// Returns the number of cues
    pub fn len(&self) -> usize {
        self.subtitles.len()
    }

    /// Returns true if the track has no cues
    pub fn is_empty(&self) -> bool {
        self.subtitles.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================

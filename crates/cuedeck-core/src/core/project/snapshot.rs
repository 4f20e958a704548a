//! Snapshot Module
//!
//! Versioned JSON persistence of a session's tracks, active track and label
//! toggle. Histories are not persisted.
//!
//! Loading is defensive: the file is read as untyped JSON and each track and
//! cue is hydrated field by field, so one malformed entry never costs the
//! rest of the session.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, trace, warn};

use crate::core::{
    captions::{Cue, Track},
    fs::{atomic_write_json_pretty, read_text_if_exists},
    new_cue_uuid,
    settings::EditorSettings,
    CoreResult, TrackId, MAX_TRACKS, ZERO_TIMESTAMP,
};

use super::Session;

/// Snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

// =============================================================================
// Snapshot Data
// =============================================================================

/// Persisted session state
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    /// Snapshot format version for migrations
    pub version: u32,
    /// Tracks in display order
    pub tracks: Vec<Track>,
    /// Active track ID
    pub active_track_id: Option<TrackId>,
    /// Track label toggle
    pub show_track_labels: bool,
    /// When the snapshot was taken (RFC 3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<String>,
}

impl SessionSnapshot {
    /// Hydrates a snapshot from untyped JSON.
    ///
    /// - A track missing `id`, `name` or a `subtitles` array is dropped.
    /// - Non-object cues are dropped; missing cue fields get defaults (zero
    ///   timestamps, fresh uuid, 1-based position as sequence number).
    /// - A track repeating an earlier track's `id` is dropped; a cue repeating
    ///   a uuid within its track gets a fresh one.
    /// - Only the first [`MAX_TRACKS`] valid tracks are kept.
    ///
    /// Returns `None` when no valid track remains.
    pub fn hydrate(value: &Value) -> Option<Self> {
        let Some(entries) = value.get("tracks").and_then(Value::as_array) else {
            warn!("Snapshot has no track list");
            return None;
        };

        let mut seen_ids = HashSet::new();
        let tracks: Vec<Track> = entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                let Some(track) = hydrate_track(entry) else {
                    warn!(index, "Dropping malformed track from snapshot");
                    return None;
                };
                if !seen_ids.insert(track.id.clone()) {
                    warn!(index, track_id = %track.id, "Dropping duplicate track from snapshot");
                    return None;
                }
                Some(track)
            })
            .take(MAX_TRACKS)
            .collect();

        if tracks.is_empty() {
            warn!("Snapshot contains no valid track");
            return None;
        }

        Some(Self {
            version: value
                .get("version")
                .and_then(Value::as_u64)
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(SNAPSHOT_VERSION),
            tracks,
            active_track_id: value
                .get("activeTrackId")
                .and_then(Value::as_str)
                .map(str::to_string),
            show_track_labels: value
                .get("showTrackLabels")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            saved_at: value
                .get("savedAt")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }
}

fn hydrate_track(entry: &Value) -> Option<Track> {
    let id = entry.get("id").and_then(Value::as_str)?;
    let name = entry.get("name").and_then(Value::as_str)?;
    let subtitles = entry.get("subtitles").and_then(Value::as_array)?;

    let mut seen_uuids = HashSet::new();
    let cues = subtitles
        .iter()
        .enumerate()
        .filter_map(|(position, cue)| {
            let Some(mut cue) = hydrate_cue(cue, position) else {
                trace!(track_id = %id, position, "Dropping non-object cue");
                return None;
            };
            if !seen_uuids.insert(cue.uuid.clone()) {
                warn!(track_id = %id, uuid = %cue.uuid, "Reassigning duplicate cue uuid");
                cue.uuid = new_cue_uuid();
                seen_uuids.insert(cue.uuid.clone());
            }
            Some(cue)
        })
        .collect();

    let mut track = Track::new(id, name, cues);
    track.header_line = entry
        .get("headerLine")
        .and_then(Value::as_str)
        .map(str::to_string);
    track.prologue_blocks = entry
        .get("prologueBlocks")
        .and_then(Value::as_array)
        .map(|blocks| {
            blocks
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .filter(|blocks| !blocks.is_empty());
    Some(track)
}

fn hydrate_cue(value: &Value, position: usize) -> Option<Cue> {
    let fields = value.as_object()?;
    let text_field = |key: &str| fields.get(key).and_then(Value::as_str);

    Some(Cue {
        id: fields
            .get("id")
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(position as u32 + 1),
        uuid: text_field("uuid")
            .filter(|u| !u.is_empty())
            .map_or_else(new_cue_uuid, str::to_string),
        start_time: text_field("startTime").unwrap_or(ZERO_TIMESTAMP).to_string(),
        end_time: text_field("endTime").unwrap_or(ZERO_TIMESTAMP).to_string(),
        text: text_field("text").unwrap_or_default().to_string(),
        track_id: None,
    })
}

// =============================================================================
// Snapshot Files
// =============================================================================

/// Writes a session snapshot atomically
pub fn save(path: &Path, session: &Session) -> CoreResult<()> {
    atomic_write_json_pretty(path, &session.to_snapshot())?;
    info!(path = %path.display(), tracks = session.tracks().len(), "Saved session snapshot");
    Ok(())
}

/// Loads a session snapshot.
///
/// A missing file, unparseable JSON or a snapshot without valid tracks
/// yields `Ok(None)` so the caller keeps a fresh session. Only I/O failures
/// other than "not found" are errors.
pub fn load(path: &Path, settings: EditorSettings) -> CoreResult<Option<Session>> {
    let Some(content) = read_text_if_exists(path)? else {
        info!(path = %path.display(), "No session snapshot found");
        return Ok(None);
    };

    let value: Value = match serde_json::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            warn!(path = %path.display(), "Ignoring unparseable session snapshot: {}", e);
            return Ok(None);
        }
    };

    let Some(snapshot) = SessionSnapshot::hydrate(&value) else {
        return Ok(None);
    };
    if snapshot.version > SNAPSHOT_VERSION {
        warn!(
            "Snapshot version {} is newer than supported version {}",
            snapshot.version, SNAPSHOT_VERSION
        );
    }

    info!(path = %path.display(), tracks = snapshot.tracks.len(), "Loaded session snapshot");
    Ok(Some(Session::from_snapshot(snapshot, settings)))
}

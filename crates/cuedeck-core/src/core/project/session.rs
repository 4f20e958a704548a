//! Editing Session
//!
//! Owns up to [`MAX_TRACKS`] tracks and their histories. One history stack
//! is live, bound to the active track; the others wait in a cache keyed by
//! track id and are swapped in when their track becomes active, so each
//! track keeps its own undo position.
//!
//! The live stack's present and the active track's `subtitles` always hold
//! the same list.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::core::{
    captions::{
        assign_track, export_document, parse_document, seconds_to_time, Cue, Dialect,
        ExportFormat, Track,
    },
    commands::{CommandResult, EditCommand},
    history::HistoryStack,
    settings::EditorSettings,
    timeline::{build_timing_index, CueTiming},
    CoreError, CoreResult, TrackId, MAX_TRACKS, ZERO_TIMESTAMP,
};

use super::snapshot::{SessionSnapshot, SNAPSHOT_VERSION};

/// Multi-track editing session
#[derive(Debug)]
pub struct Session {
    /// Tracks in display order
    tracks: Vec<Track>,
    /// Currently active track
    active_track_id: Option<TrackId>,
    /// History bound to the active track
    history: HistoryStack,
    /// Histories of inactive tracks
    history_cache: HashMap<TrackId, HistoryStack>,
    /// Whether cue lists are labelled with their track name
    show_track_labels: bool,
    settings: EditorSettings,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(EditorSettings::default())
    }
}

impl Session {
    /// Creates an empty session
    pub fn new(settings: EditorSettings) -> Self {
        let settings = settings.normalized();
        Self {
            tracks: Vec::new(),
            active_track_id: None,
            history: HistoryStack::new().with_limit(settings.history_limit),
            history_cache: HashMap::new(),
            show_track_labels: settings.show_track_labels,
            settings,
        }
    }

    // =========================================================================
    // Settings
    // =========================================================================

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    /// Replaces the settings, applying the history limit to every stack
    pub fn set_settings(&mut self, settings: EditorSettings) {
        self.settings = settings.normalized();
        let limit = self.settings.history_limit;
        self.history.set_limit(limit);
        for stack in self.history_cache.values_mut() {
            stack.set_limit(limit);
        }
    }

    pub fn show_track_labels(&self) -> bool {
        self.show_track_labels
    }

    pub fn set_show_track_labels(&mut self, show: bool) {
        self.show_track_labels = show;
    }

    /// Flips the track label toggle and returns the new value
    pub fn toggle_track_labels(&mut self) -> bool {
        self.show_track_labels = !self.show_track_labels;
        self.show_track_labels
    }

    // =========================================================================
    // Track Queries
    // =========================================================================

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, track_id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == track_id)
    }

    pub fn active_track_id(&self) -> Option<&str> {
        self.active_track_id.as_deref()
    }

    pub fn active_track(&self) -> Option<&Track> {
        self.active_track_id.as_deref().and_then(|id| self.track(id))
    }

    /// Cue list of the active track (empty when there is none)
    pub fn active_cues(&self) -> &[Cue] {
        self.history.present()
    }

    /// Timing index of the active track, in chronological order
    pub fn timing_index(&self) -> Vec<CueTiming> {
        build_timing_index(self.active_cues())
    }

    fn track_index(&self, track_id: &str) -> CoreResult<usize> {
        self.tracks
            .iter()
            .position(|t| t.id == track_id)
            .ok_or_else(|| CoreError::TrackNotFound(track_id.to_string()))
    }

    fn require_active(&self) -> CoreResult<TrackId> {
        self.active_track_id.clone().ok_or(CoreError::NoActiveTrack)
    }

    // =========================================================================
    // Track Lifecycle
    // =========================================================================

    /// Adds a track and makes it active
    pub fn add_track(&mut self, mut track: Track) -> CoreResult<TrackId> {
        if self.tracks.len() >= MAX_TRACKS {
            return Err(CoreError::TrackLimitReached(MAX_TRACKS));
        }
        if self.track(&track.id).is_some() {
            return Err(CoreError::ValidationError(format!(
                "Track already exists: {}",
                track.id
            )));
        }

        assign_track(&mut track.subtitles, &track.id);
        let track_id = track.id.clone();
        info!(
            track_id = %track_id,
            name = %track.name,
            cues = track.subtitles.len(),
            "Created track"
        );
        self.tracks.push(track);
        self.set_active_track(&track_id)?;
        Ok(track_id)
    }

    /// Creates a named track from a cue list and makes it active
    pub fn create_track(&mut self, name: &str, cues: Vec<Cue>) -> CoreResult<TrackId> {
        self.add_track(Track::create(name, cues))
    }

    /// Parses a document into a new active track, keeping its WebVTT prologue
    pub fn load_document(
        &mut self,
        name: &str,
        content: &str,
        dialect: Dialect,
    ) -> CoreResult<TrackId> {
        let parsed = parse_document(content, dialect);
        info!(
            name = %name,
            dialect = dialect.extension(),
            cues = parsed.cues.len(),
            "Loaded document"
        );
        self.add_track(Track::create(name, parsed.cues).with_metadata(parsed.metadata))
    }

    /// Creates a track holding one empty cue of the default duration
    pub fn start_from_scratch(&mut self, name: &str) -> CoreResult<TrackId> {
        let end_time = seconds_to_time(self.settings.default_cue_duration_sec);
        let cue = Cue::new(1, ZERO_TIMESTAMP, &end_time, "");
        self.create_track(name, vec![cue])
    }

    pub fn rename_track(&mut self, track_id: &str, name: &str) -> CoreResult<()> {
        let index = self.track_index(track_id)?;
        self.tracks[index].name = name.to_string();
        Ok(())
    }

    /// Switches the live history to another track.
    ///
    /// The current stack is written back to the cache first; a track without
    /// a cached stack gets one seeded from its cue list.
    pub fn set_active_track(&mut self, track_id: &str) -> CoreResult<()> {
        let index = self.track_index(track_id)?;
        if self.active_track_id.as_deref() == Some(track_id) {
            return Ok(());
        }

        if let Some(previous) = self.active_track_id.take() {
            let stack = std::mem::take(&mut self.history);
            self.history_cache.insert(previous, stack);
        }

        self.history = self.history_cache.remove(track_id).unwrap_or_else(|| {
            HistoryStack::seeded(self.tracks[index].subtitles.clone())
                .with_limit(self.settings.history_limit)
        });
        self.active_track_id = Some(track_id.to_string());
        info!(track_id = %track_id, "Activated track");
        Ok(())
    }

    /// Deletes a track and its history.
    ///
    /// If it was active, the track now at the same position (or the last one)
    /// becomes active; with no tracks left the live history is empty.
    pub fn delete_track(&mut self, track_id: &str) -> CoreResult<()> {
        let index = self.track_index(track_id)?;
        self.tracks.remove(index);
        self.history_cache.remove(track_id);
        info!(track_id = %track_id, remaining = self.tracks.len(), "Deleted track");

        if self.active_track_id.as_deref() != Some(track_id) {
            return Ok(());
        }

        self.active_track_id = None;
        self.history = HistoryStack::new().with_limit(self.settings.history_limit);
        let next = self
            .tracks
            .get(index)
            .or_else(|| self.tracks.last())
            .map(|t| t.id.clone());
        if let Some(next) = next {
            self.set_active_track(&next)?;
        }
        Ok(())
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Commits a new cue list to the active track.
    ///
    /// Returns false when the list equals the current one; nothing is
    /// recorded in that case.
    pub fn commit(&mut self, mut next: Vec<Cue>) -> CoreResult<bool> {
        let track_id = self.require_active()?;
        assign_track(&mut next, &track_id);

        let committed = self.history.commit(next);
        if committed {
            self.sync_active_track();
            debug!(
                track_id = %track_id,
                cues = self.history.present().len(),
                undo_depth = self.history.undo_count(),
                "Committed cue list"
            );
        } else {
            debug!(track_id = %track_id, "Skipped commit of unchanged cue list");
        }
        Ok(committed)
    }

    /// Runs an edit against the active track and commits the result
    pub fn execute(&mut self, command: &EditCommand) -> CoreResult<CommandResult> {
        self.require_active()?;
        let before = self.history.present().to_vec();
        let next = command.apply(&before, &self.settings)?;

        let committed = self.commit(next)?;
        let result = CommandResult::generate().committed(committed);
        let result = if committed {
            result.with_diff(&before, self.history.present())
        } else {
            result
        };

        debug!(
            op_id = %result.op_id,
            command = command.type_name(),
            committed,
            changes = result.changes.len(),
            "Executed edit command"
        );
        Ok(result)
    }

    /// Steps the active track back one edit. State is untouched on error.
    pub fn undo(&mut self) -> CoreResult<()> {
        if !self.history.undo() {
            return Err(CoreError::NothingToUndo);
        }
        self.sync_active_track();
        Ok(())
    }

    /// Re-applies the last undone edit. State is untouched on error.
    pub fn redo(&mut self) -> CoreResult<()> {
        if !self.history.redo() {
            return Err(CoreError::NothingToRedo);
        }
        self.sync_active_track();
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn sync_active_track(&mut self) {
        let Some(track_id) = self.active_track_id.as_deref() else {
            return;
        };
        if let Some(track) = self.tracks.iter_mut().find(|t| t.id == track_id) {
            track.subtitles = self.history.present().to_vec();
        }
    }

    // =========================================================================
    // Export / Persistence
    // =========================================================================

    /// Renders a track in the requested form
    pub fn export_track(&self, track_id: &str, format: ExportFormat) -> CoreResult<String> {
        let track = &self.tracks[self.track_index(track_id)?];
        Ok(export_document(&track.subtitles, format, &track.metadata()))
    }

    /// Captures the persistable state (histories are not persisted)
    pub fn to_snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            version: SNAPSHOT_VERSION,
            tracks: self.tracks.clone(),
            active_track_id: self.active_track_id.clone(),
            show_track_labels: self.show_track_labels,
            saved_at: Some(chrono::Utc::now().to_rfc3339()),
        }
    }

    /// Rebuilds a session from a snapshot with fresh histories.
    ///
    /// Tracks repeating an earlier id are skipped. An unknown active track id
    /// falls back to the first track.
    pub fn from_snapshot(snapshot: SessionSnapshot, settings: EditorSettings) -> Self {
        let mut session = Self::new(settings);
        session.show_track_labels = snapshot.show_track_labels;
        for mut track in snapshot.tracks {
            if session.tracks.len() >= MAX_TRACKS {
                break;
            }
            if session.track(&track.id).is_some() {
                warn!(track_id = %track.id, "Skipping duplicate track in snapshot");
                continue;
            }
            assign_track(&mut track.subtitles, &track.id);
            session.tracks.push(track);
        }

        let active = snapshot
            .active_track_id
            .filter(|id| session.track(id).is_some())
            .or_else(|| session.tracks.first().map(|t| t.id.clone()));
        if let Some(active) = active {
            if let Err(e) = session.set_active_track(&active) {
                warn!("Failed to activate restored track {}: {}", active, e);
            }
        }
        session
    }
}

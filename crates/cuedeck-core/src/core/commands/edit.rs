//! Edit Commands
//!
//! Serializable descriptions of cue edits. A command is applied to the
//! active track's cue list by the session, which commits the result to
//! history and reports what changed.

use serde::{Deserialize, Serialize};

use crate::core::captions::Cue;
use crate::core::settings::EditorSettings;
use crate::core::timeline::{
    add_cue_with_duration, bulk_shift, delete_cue, merge_cues, sort_chronologically, split_cue,
    split_cue_at_time, update_cue_text, update_cue_timing, ShiftMode,
};
use crate::core::{CoreResult, CueUuid, TimeSec};

/// An edit to the active track's cue list
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EditCommand {
    /// Insert a cue after `before_id`, ending at `after_id`'s start if given
    AddCue {
        before_id: CueUuid,
        #[serde(default)]
        after_id: Option<CueUuid>,
        #[serde(default)]
        text: String,
    },
    DeleteCue {
        cue_id: CueUuid,
    },
    MergeCues {
        first_id: CueUuid,
        second_id: CueUuid,
    },
    /// Split at a caret position within the text
    SplitCue {
        cue_id: CueUuid,
        caret_position: usize,
        text_length: usize,
    },
    /// Split at an absolute time
    SplitCueAtTime {
        cue_id: CueUuid,
        time_sec: TimeSec,
    },
    BulkShift {
        cue_ids: Vec<CueUuid>,
        offset_sec: TimeSec,
        #[serde(default)]
        mode: ShiftMode,
    },
    UpdateText {
        cue_id: CueUuid,
        text: String,
    },
    UpdateTiming {
        cue_id: CueUuid,
        start_time: String,
        end_time: String,
    },
    SortChronologically,
}

impl EditCommand {
    /// Command type name, used for logging
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::AddCue { .. } => "AddCue",
            Self::DeleteCue { .. } => "DeleteCue",
            Self::MergeCues { .. } => "MergeCues",
            Self::SplitCue { .. } => "SplitCue",
            Self::SplitCueAtTime { .. } => "SplitCueAtTime",
            Self::BulkShift { .. } => "BulkShift",
            Self::UpdateText { .. } => "UpdateText",
            Self::UpdateTiming { .. } => "UpdateTiming",
            Self::SortChronologically => "SortChronologically",
        }
    }

    /// Produces the edited cue list. The input is never modified.
    ///
    /// Only timing updates can fail; every other command returns the input
    /// unchanged when it cannot apply.
    pub fn apply(&self, cues: &[Cue], settings: &EditorSettings) -> CoreResult<Vec<Cue>> {
        let next = match self {
            Self::AddCue {
                before_id,
                after_id,
                text,
            } => add_cue_with_duration(
                cues,
                before_id,
                after_id.as_deref(),
                text,
                settings.default_cue_duration_sec,
            ),
            Self::DeleteCue { cue_id } => delete_cue(cues, cue_id),
            Self::MergeCues {
                first_id,
                second_id,
            } => merge_cues(cues, first_id, second_id),
            Self::SplitCue {
                cue_id,
                caret_position,
                text_length,
            } => split_cue(cues, cue_id, *caret_position, *text_length),
            Self::SplitCueAtTime { cue_id, time_sec } => {
                split_cue_at_time(cues, cue_id, *time_sec, &settings.split_placeholder)
            }
            Self::BulkShift {
                cue_ids,
                offset_sec,
                mode,
            } => {
                let targets: Vec<&str> = cue_ids.iter().map(String::as_str).collect();
                bulk_shift(cues, &targets, *offset_sec, *mode)
            }
            Self::UpdateText { cue_id, text } => update_cue_text(cues, cue_id, text),
            Self::UpdateTiming {
                cue_id,
                start_time,
                end_time,
            } => update_cue_timing(cues, cue_id, start_time, end_time)?,
            Self::SortChronologically => sort_chronologically(cues).into_owned(),
        };
        Ok(next)
    }
}

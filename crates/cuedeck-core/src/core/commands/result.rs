//! Command Result Definition
//!
//! Describes what an executed edit changed, so callers can refresh only the
//! affected cues.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::{captions::Cue, CueUuid, OpId};

/// Command execution result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult {
    /// Generated Operation ID
    pub op_id: OpId,

    /// False when the edit produced an identical list and nothing was recorded
    pub committed: bool,

    /// List of state changes
    pub changes: Vec<StateChange>,

    /// Newly created cue uuids
    pub created_ids: Vec<CueUuid>,

    /// Deleted cue uuids
    pub deleted_ids: Vec<CueUuid>,
}

impl CommandResult {
    /// Creates a new empty command result with the given operation ID
    pub fn new(op_id: &str) -> Self {
        Self {
            op_id: op_id.to_string(),
            committed: false,
            changes: vec![],
            created_ids: vec![],
            deleted_ids: vec![],
        }
    }

    /// Creates a result with a freshly generated operation ID
    pub fn generate() -> Self {
        Self::new(&ulid::Ulid::new().to_string())
    }

    /// Marks the result as committed to history
    pub fn committed(mut self, committed: bool) -> Self {
        self.committed = committed;
        self
    }

    /// Adds a state change
    pub fn with_change(mut self, change: StateChange) -> Self {
        self.changes.push(change);
        self
    }

    /// Adds a created ID
    pub fn with_created_id(mut self, id: &str) -> Self {
        self.created_ids.push(id.to_string());
        self
    }

    /// Adds a deleted ID
    pub fn with_deleted_id(mut self, id: &str) -> Self {
        self.deleted_ids.push(id.to_string());
        self
    }

    /// Records the differences between two cue lists, matched by uuid.
    ///
    /// Sequence number changes alone do not count as a modification.
    pub fn with_diff(mut self, before: &[Cue], after: &[Cue]) -> Self {
        let previous: HashMap<&str, &Cue> = before.iter().map(|c| (c.uuid.as_str(), c)).collect();
        let current: HashMap<&str, &Cue> = after.iter().map(|c| (c.uuid.as_str(), c)).collect();

        for cue in after {
            match previous.get(cue.uuid.as_str()) {
                None => {
                    self = self
                        .with_change(StateChange::CueCreated {
                            cue_id: cue.uuid.clone(),
                        })
                        .with_created_id(&cue.uuid);
                }
                Some(old) if !same_content(old, cue) => {
                    self = self.with_change(StateChange::CueModified {
                        cue_id: cue.uuid.clone(),
                    });
                }
                Some(_) => {}
            }
        }

        for cue in before {
            if !current.contains_key(cue.uuid.as_str()) {
                self = self
                    .with_change(StateChange::CueDeleted {
                        cue_id: cue.uuid.clone(),
                    })
                    .with_deleted_id(&cue.uuid);
            }
        }

        self
    }
}

fn same_content(a: &Cue, b: &Cue) -> bool {
    a.start_time == b.start_time
        && a.end_time == b.end_time
        && a.text == b.text
        && a.track_id == b.track_id
}

/// State change types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum StateChange {
    CueCreated { cue_id: CueUuid },
    CueModified { cue_id: CueUuid },
    CueDeleted { cue_id: CueUuid },
}

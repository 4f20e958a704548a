//! CueDeck Error Definitions
//!
//! Defines error types used throughout the project.

use thiserror::Error;

use super::{CueUuid, TimeSec, TrackId};

/// Core engine error types
#[derive(Error, Debug)]
pub enum CoreError {
    // =========================================================================
    // Session / Track Errors
    // =========================================================================
    #[error("Track not found: {0}")]
    TrackNotFound(TrackId),

    #[error("Track limit reached: a session holds at most {0} tracks")]
    TrackLimitReached(usize),

    #[error("No active track")]
    NoActiveTrack,

    // =========================================================================
    // Cue Errors
    // =========================================================================
    #[error("Cue not found: {0}")]
    CueNotFound(CueUuid),

    #[error("Invalid time format: {0} (expected HH:MM:SS,mmm)")]
    InvalidTimeFormat(String),

    #[error("Invalid time range: {0:.3}~{1:.3} seconds")]
    InvalidTimeRange(TimeSec, TimeSec),

    // =========================================================================
    // History Errors
    // =========================================================================
    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    // =========================================================================
    // Format Errors
    // =========================================================================
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    // =========================================================================
    // General Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Core engine result type
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Returns true for errors the UI should surface as a validation toast
    /// rather than an internal failure.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::InvalidTimeFormat(_)
                | Self::InvalidTimeRange(_, _)
                | Self::TrackLimitReached(_)
                | Self::NothingToUndo
                | Self::NothingToRedo
                | Self::ValidationError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidTimeRange(5.0, 3.0);
        assert_eq!(err.to_string(), "Invalid time range: 5.000~3.000 seconds");

        let err = CoreError::TrackLimitReached(4);
        assert!(err.to_string().contains("at most 4"));
    }

    #[test]
    fn test_user_facing_classification() {
        assert!(CoreError::InvalidTimeFormat("1:2".into()).is_user_facing());
        assert!(CoreError::NothingToUndo.is_user_facing());
        assert!(!CoreError::CueNotFound("c1".into()).is_user_facing());
    }
}

//! Caption System Module
//!
//! Provides the subtitle data model and its text codecs:
//! - Cue and track models (Cue, Track, DocumentMetadata)
//! - Timestamp codec for the SRT and VTT dialects
//! - SRT and VTT parsing and serialization, with VTT prologue preservation
//! - Plain text and CSV exports
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Caption System                               │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  models.rs     - Data structures (Cue, Track, DocumentMetadata) │
//! │  timecode.rs   - HH:MM:SS,mmm <-> seconds, VTT normalization    │
//! │  formats.rs    - SRT/VTT parsing, prologue capture, export      │
//! │  export.rs     - Plain text / CSV, export dispatch              │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use cuedeck_core::core::captions::{parse_srt, export_vtt, DocumentMetadata};
//!
//! let cues = parse_srt(&std::fs::read_to_string("subtitles.srt")?);
//! let vtt = export_vtt(&cues, &DocumentMetadata::default());
//! ```

mod export;
mod formats;
mod models;
pub mod timecode;

// Re-export models
pub use models::{assign_track, renumber, Cue, DocumentMetadata, Track};

// Re-export format functions
pub use formats::{
    export_srt, export_vtt, extract_prologue, parse_document, parse_srt, parse_vtt, Dialect,
    ParsedDocument, VTT_HEADER,
};

pub use export::{
    csv_field, export_csv, export_document, export_plain_text, flatten_cue_text, ExportFormat,
};

pub use timecode::{
    canonical_to_vtt, is_valid_time, seconds_to_time, time_to_seconds, vtt_to_canonical,
};

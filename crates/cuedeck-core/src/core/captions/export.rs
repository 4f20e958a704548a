//! Derived Exports
//!
//! Flattened plain text and CSV renditions of a cue list, plus the single
//! export dispatch used by the session and the CLI.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use super::formats::{export_srt, export_vtt, in_export_order};
use super::models::{Cue, DocumentMetadata};
use crate::core::CoreError;

/// Inline tags that survive plain-text export
const PLAIN_TEXT_TAG_ALLOWLIST: &[&str] = &["b", "i", "u"];

static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?([A-Za-z][A-Za-z0-9.]*)[^>]*>").expect("valid tag regex"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

// =============================================================================
// Export Format
// =============================================================================

/// Output forms a track can be exported to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExportFormat {
    Srt,
    Vtt,
    PlainText,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Srt => "srt",
            Self::Vtt => "vtt",
            Self::PlainText => "txt",
            Self::Csv => "csv",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Srt => "application/x-subrip",
            Self::Vtt => "text/vtt",
            Self::PlainText => "text/plain",
            Self::Csv => "text/csv",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "srt" => Ok(Self::Srt),
            "vtt" | "webvtt" => Ok(Self::Vtt),
            "txt" | "text" | "plaintext" => Ok(Self::PlainText),
            "csv" => Ok(Self::Csv),
            other => Err(CoreError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Renders a cue list in the requested form.
///
/// `metadata` is only consulted for WebVTT output.
pub fn export_document(cues: &[Cue], format: ExportFormat, metadata: &DocumentMetadata) -> String {
    match format {
        ExportFormat::Srt => export_srt(cues),
        ExportFormat::Vtt => export_vtt(cues, metadata),
        ExportFormat::PlainText => export_plain_text(cues),
        ExportFormat::Csv => export_csv(cues),
    }
}

// =============================================================================
// Plain Text
// =============================================================================

/// Flattens a cue's text to one line: strips markup outside the allowlist
/// (`b`, `i`, `u`) and collapses whitespace runs (including newlines) to single spaces.
pub fn flatten_cue_text(text: &str) -> String {
    let stripped = MARKUP_TAG.replace_all(text, |caps: &Captures| {
        let name = caps[1].to_ascii_lowercase();
        if !PLAIN_TEXT_TAG_ALLOWLIST.contains(&name.as_str()) {
            return String::new();
        }
        // Allowlisted tags are kept without attributes.
        if caps[0].starts_with("</") {
            format!("</{name}>")
        } else {
            format!("<{name}>")
        }
    });
    WHITESPACE_RUN.replace_all(&stripped, " ").trim().to_string()
}

/// One cue per line; cues that flatten to nothing are omitted
pub fn export_plain_text(cues: &[Cue]) -> String {
    let mut output = String::new();
    for cue in in_export_order(cues) {
        let line = flatten_cue_text(&cue.text);
        if line.is_empty() {
            continue;
        }
        output.push_str(&line);
        output.push('\n');
    }
    output
}

// =============================================================================
// CSV
// =============================================================================

/// Quotes a CSV field when it contains a comma, quote or line break.
/// Empty fields are emitted as `""`.
pub fn csv_field(value: &str) -> String {
    if value.is_empty() {
        return "\"\"".to_string();
    }
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Header row plus one `Index,Start,End,Text` row per cue
pub fn export_csv(cues: &[Cue]) -> String {
    let mut output = String::from("Index,Start,End,Text\n");
    for cue in in_export_order(cues) {
        let row = [
            cue.id.to_string(),
            csv_field(&cue.start_time),
            csv_field(&cue.end_time),
            csv_field(&cue.text),
        ];
        output.push_str(&row.join(","));
        output.push('\n');
    }
    output
}

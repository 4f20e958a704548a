//! Caption Format Parsers and Serializers
//!
//! Supports parsing and serializing captions in two dialects:
//! - SRT (SubRip), the canonical `HH:MM:SS,mmm` block format
//! - VTT (WebVTT), dot-millisecond timestamps with header and
//!   NOTE/STYLE/REGION blocks
//!
//! Parsers never fail: malformed blocks are skipped and the rest of the
//! document is kept. Parsed cues are renumbered `1..N` by position.
//!
//! # Example
//!
//! ```rust,ignore
//! use cuedeck_core::core::captions::{parse_document, Dialect, export_vtt};
//!
//! let dialect = Dialect::resolve(Some("episode.vtt"), &content);
//! let doc = parse_document(&content, dialect);
//! let vtt = export_vtt(&doc.cues, &doc.metadata);
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::models::{renumber, Cue, DocumentMetadata};
use super::timecode::{canonical_to_vtt, time_to_seconds, vtt_to_canonical};

/// Header marker of the WebVTT dialect
pub const VTT_HEADER: &str = "WEBVTT";

static BLOCK_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n(?:[ \t]*\n)+").expect("valid block separator regex"));

static SRT_TIMING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d{2}:\d{2}:\d{2},\d{3})\s*-->\s*(\d{2}:\d{2}:\d{2},\d{3})(?:\s|$)")
        .expect("valid srt timing regex")
});

static VTT_TIMING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*((?:\d{2,}:)?\d{2}:\d{2}\.\d{3})[ \t]+-->[ \t]+((?:\d{2,}:)?\d{2}:\d{2}\.\d{3})(?:[ \t].*)?$",
    )
    .expect("valid vtt timing regex")
});

// =============================================================================
// Dialect Resolution
// =============================================================================

/// Subtitle dialect, resolved once when a document is loaded
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// SubRip (`HH:MM:SS,mmm`)
    Srt,
    /// WebVTT (`HH:MM:SS.mmm`, optional hours)
    Vtt,
}

impl Dialect {
    /// Maps a file extension (with or without the dot) to a dialect
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "srt" => Some(Self::Srt),
            "vtt" => Some(Self::Vtt),
            _ => None,
        }
    }

    /// Sniffs the first non-blank line for the WebVTT marker
    pub fn sniff(content: &str) -> Self {
        let first = content
            .trim_start_matches('\u{FEFF}')
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty());
        match first {
            Some(line) if is_header_line(line) => Self::Vtt,
            _ => Self::Srt,
        }
    }

    /// Resolves from a file name's extension, falling back to sniffing
    pub fn resolve(file_name: Option<&str>, content: &str) -> Self {
        file_name
            .and_then(|name| std::path::Path::new(name).extension())
            .and_then(|ext| Self::from_extension(&ext.to_string_lossy()))
            .unwrap_or_else(|| Self::sniff(content))
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Srt => "srt",
            Self::Vtt => "vtt",
        }
    }
}

/// Result of parsing a document in either dialect
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedDocument {
    pub cues: Vec<Cue>,
    /// Populated for WebVTT input only
    pub metadata: DocumentMetadata,
}

/// Parses a document in the given dialect
pub fn parse_document(content: &str, dialect: Dialect) -> ParsedDocument {
    match dialect {
        Dialect::Srt => ParsedDocument {
            cues: parse_srt(content),
            metadata: DocumentMetadata::default(),
        },
        Dialect::Vtt => ParsedDocument {
            cues: parse_vtt(content),
            metadata: extract_prologue(content),
        },
    }
}

fn normalize_input(content: &str) -> String {
    content
        .trim_start_matches('\u{FEFF}')
        .replace("\r\n", "\n")
        .replace('\r', "\n")
}

// =============================================================================
// SRT Format
// =============================================================================

/// Parses SRT (SubRip) content into a list of cues
///
/// # SRT Format
///
/// ```text
/// 1
/// 00:00:01,000 --> 00:00:04,000
/// First caption text
///
/// 2
/// 00:00:05,500 --> 00:00:08,000
/// Second caption text
/// with multiple lines
/// ```
///
/// Each block needs an index line, a timing line and at least one text line.
/// The index line is ignored; cues are renumbered by position.
pub fn parse_srt(content: &str) -> Vec<Cue> {
    let normalized = normalize_input(content);
    let mut cues = Vec::new();

    for block in BLOCK_SEPARATOR.split(normalized.trim_matches('\n')) {
        let lines: Vec<&str> = block.lines().collect();
        if lines.len() < 3 {
            if !block.trim().is_empty() {
                trace!("Skipping SRT block with {} line(s)", lines.len());
            }
            continue;
        }

        let Some(caps) = SRT_TIMING.captures(lines[1]) else {
            trace!("Skipping SRT block without timing line: {:?}", lines[1]);
            continue;
        };

        let text = lines[2..].join("\n");
        cues.push(Cue::new(0, &caps[1], &caps[2], &text));
    }

    renumber(&mut cues);
    cues
}

/// Serializes cues to SRT, ordered by sequence number
pub fn export_srt(cues: &[Cue]) -> String {
    write_cue_blocks(cues, |ts| ts.to_string())
}

/// Returns cues in export order (by sequence number, stable)
pub(crate) fn in_export_order(cues: &[Cue]) -> Vec<&Cue> {
    let mut ordered: Vec<&Cue> = cues.iter().collect();
    ordered.sort_by_key(|c| c.id);
    ordered
}

/// Writes index / timing / text blocks, formatting each timestamp with `fmt_ts`
fn write_cue_blocks(cues: &[Cue], fmt_ts: impl Fn(&str) -> String) -> String {
    let mut output = String::new();

    for cue in in_export_order(cues) {
        if !output.is_empty() {
            output.push('\n');
        }
        output.push_str(&format!("{}\n", cue.id));
        output.push_str(&format!(
            "{} --> {}\n",
            fmt_ts(&cue.start_time),
            fmt_ts(&cue.end_time)
        ));
        output.push_str(&cue.text);
        output.push('\n');
    }

    output
}

// =============================================================================
// VTT Format
// =============================================================================

fn is_header_line(line: &str) -> bool {
    line.strip_prefix(VTT_HEADER)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
}

fn is_vtt_timing_line(line: &str) -> bool {
    VTT_TIMING.is_match(line)
}

fn is_prologue_block_start(line: &str) -> bool {
    matches!(
        line.split_whitespace().next(),
        Some("NOTE") | Some("STYLE") | Some("REGION")
    )
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Index of the first blank line at or after `from` (or `lines.len()`)
fn block_end(lines: &[&str], from: usize) -> usize {
    lines[from..]
        .iter()
        .position(|l| is_blank(l))
        .map_or(lines.len(), |offset| from + offset)
}

/// Parses WebVTT content into a list of cues
///
/// # VTT Format
///
/// ```text
/// WEBVTT
///
/// NOTE written by hand
///
/// intro
/// 00:01.000 --> 00:04.000 align:start
/// First <i>caption</i>
/// ```
///
/// Cue identifiers and cue settings are discarded; inline markup is kept.
/// Cues whose end does not exceed their start are skipped.
pub fn parse_vtt(content: &str) -> Vec<Cue> {
    let normalized = normalize_input(content);
    let lines: Vec<&str> = normalized.split('\n').collect();
    let mut cues = Vec::new();
    let mut i = 0;

    if lines.first().is_some_and(|l| is_header_line(l.trim())) {
        i = 1;
        // Header metadata runs until the first blank line.
        while i < lines.len()
            && !is_blank(lines[i])
            && !is_vtt_timing_line(lines[i])
            && !lines.get(i + 1).is_some_and(|next| is_vtt_timing_line(next))
        {
            i += 1;
        }
    }

    while i < lines.len() {
        let line = lines[i];

        if is_blank(line) {
            i += 1;
        } else if is_prologue_block_start(line) {
            i = block_end(&lines, i);
        } else if is_vtt_timing_line(line) {
            i = parse_vtt_cue(&lines, i, &mut cues);
        } else if lines.get(i + 1).is_some_and(|next| is_vtt_timing_line(next)) {
            // Cue identifier line
            i = parse_vtt_cue(&lines, i + 1, &mut cues);
        } else {
            trace!("Skipping stray VTT line: {:?}", line);
            i += 1;
        }
    }

    renumber(&mut cues);
    cues
}

/// Parses the cue whose timing line sits at `timing_index`; returns the index
/// following the cue's text.
fn parse_vtt_cue(lines: &[&str], timing_index: usize, cues: &mut Vec<Cue>) -> usize {
    let text_start = timing_index + 1;
    let text_end = block_end(lines, text_start.min(lines.len()));

    let Some(caps) = VTT_TIMING.captures(lines[timing_index]) else {
        return text_end;
    };

    let (Some(start), Some(end)) = (vtt_to_canonical(&caps[1]), vtt_to_canonical(&caps[2])) else {
        trace!("Skipping VTT cue with unparseable timing: {:?}", lines[timing_index]);
        return text_end;
    };

    let (start_sec, end_sec) = (time_to_seconds(&start), time_to_seconds(&end));
    if !start_sec.is_finite() || !end_sec.is_finite() || end_sec <= start_sec {
        trace!("Skipping VTT cue with non-positive duration: {} --> {}", start, end);
        return text_end;
    }

    let text = lines[text_start.min(text_end)..text_end].join("\n");
    cues.push(Cue::new(0, &start, &end, &text));
    text_end
}

/// Captures the WebVTT header and the NOTE/STYLE/REGION blocks that precede
/// the first cue.
///
/// The header defaults to the bare `WEBVTT` marker. Scanning stops at the
/// first block that is not a prologue block, so ambiguous content is never
/// swallowed.
pub fn extract_prologue(content: &str) -> DocumentMetadata {
    let normalized = normalize_input(content);
    let lines: Vec<&str> = normalized.split('\n').collect();
    let mut i = 0;
    let mut header_line = VTT_HEADER.to_string();

    if lines.first().is_some_and(|l| is_header_line(l.trim())) {
        let end = block_end(&lines, 0);
        let header_end = (1..end)
            .find(|&j| {
                is_vtt_timing_line(lines[j])
                    || lines.get(j + 1).is_some_and(|next| is_vtt_timing_line(next))
            })
            .unwrap_or(end);
        header_line = lines[..header_end].join("\n").trim_end().to_string();
        i = header_end;
    }

    let mut prologue_blocks = Vec::new();
    while i < lines.len() {
        if is_blank(lines[i]) {
            i += 1;
            continue;
        }
        if !is_prologue_block_start(lines[i]) {
            break;
        }
        let end = block_end(&lines, i);
        prologue_blocks.push(lines[i..end].join("\n"));
        i = end;
    }

    DocumentMetadata {
        header_line: Some(header_line),
        prologue_blocks,
    }
}

/// Serializes cues to WebVTT, splicing the header and prologue blocks in
/// front of the cues.
pub fn export_vtt(cues: &[Cue], metadata: &DocumentMetadata) -> String {
    let header = metadata
        .header_line
        .as_deref()
        .filter(|h| !h.trim().is_empty())
        .unwrap_or(VTT_HEADER);

    let mut output = String::from(header.trim_end());
    output.push_str("\n\n");

    for block in &metadata.prologue_blocks {
        let block = block.trim_matches('\n');
        if block.is_empty() {
            continue;
        }
        output.push_str(block);
        output.push_str("\n\n");
    }

    let body = write_cue_blocks(cues, canonical_to_vtt);
    if body.is_empty() {
        output.truncate(output.trim_end().len());
        output.push('\n');
    } else {
        output.push_str(&body);
    }
    output
}

// =============================================================================
// Tests
// =============================================================================

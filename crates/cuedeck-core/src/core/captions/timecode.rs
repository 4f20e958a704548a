//! Timestamp Codec
//!
//! Converts between the canonical SubRip timestamp (`HH:MM:SS,mmm`) and
//! seconds, and between the canonical form and the WebVTT dialect
//! (`HH:MM:SS.mmm` or `MM:SS.mmm`).

use std::sync::LazyLock;

use regex::Regex;

use crate::core::{TimeSec, ZERO_TIMESTAMP};

static CANONICAL_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}:\d{2}:\d{2},\d{3}$").expect("valid timestamp regex"));

static VTT_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(\d{2,}):)?(\d{2}):(\d{2})\.(\d{3})$").expect("valid vtt timestamp regex")
});

/// Parses a canonical timestamp into seconds.
///
/// Malformed input yields `NaN` instead of an error; callers that branch on
/// the value should check [`is_valid_time`] first.
pub fn time_to_seconds(text: &str) -> TimeSec {
    let parts: Vec<&str> = text.trim().split(':').collect();
    let [hours, minutes, seconds] = parts.as_slice() else {
        return f64::NAN;
    };

    let parse = |s: &str| -> TimeSec {
        let s = s.trim();
        if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return f64::NAN;
        }
        s.parse::<f64>().unwrap_or(f64::NAN)
    };

    let hours = parse(hours);
    let minutes = parse(minutes);
    let seconds = parse(&seconds.replace(',', "."));

    hours * 3600.0 + minutes * 60.0 + seconds
}

/// Formats seconds as a canonical timestamp (`HH:MM:SS,mmm`).
///
/// Rounds to the nearest millisecond. Negative or non-finite input formats
/// as the zero timestamp.
pub fn seconds_to_time(seconds: TimeSec) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return ZERO_TIMESTAMP.to_string();
    }

    let total_ms = (seconds * 1000.0).round() as u64;
    let ms = total_ms % 1000;
    let total_secs = total_ms / 1000;
    let secs = total_secs % 60;
    let total_mins = total_secs / 60;
    let mins = total_mins % 60;
    let hours = total_mins / 60;

    format!("{:02}:{:02}:{:02},{:03}", hours, mins, secs, ms)
}

/// Strict canonical format check: `^\d{2}:\d{2}:\d{2},\d{3}$`
pub fn is_valid_time(text: &str) -> bool {
    CANONICAL_TIME.is_match(text)
}

/// Maps a WebVTT timestamp to the canonical dialect.
///
/// `MM:SS.mmm` gains a zero hours field. Returns `None` when the input is not
/// a WebVTT timestamp.
pub fn vtt_to_canonical(ts: &str) -> Option<String> {
    let caps = VTT_TIME.captures(ts.trim())?;
    let hours = caps.get(1).map(|m| m.as_str()).unwrap_or("00");
    Some(format!("{}:{}:{},{}", hours, &caps[2], &caps[3], &caps[4]))
}

/// Rewrites a canonical timestamp with the WebVTT decimal separator.
pub fn canonical_to_vtt(ts: &str) -> String {
    ts.replacen(',', ".", 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Parsing
    // -------------------------------------------------------------------------

    #[test]
    fn test_time_to_seconds() {
        assert_eq!(time_to_seconds("00:00:01,500"), 1.5);
        assert_eq!(time_to_seconds("00:01:30,000"), 90.0);
        assert_eq!(time_to_seconds("01:30:00,000"), 5400.0);
        assert!((time_to_seconds("00:00:00,100") - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_time_to_seconds_malformed_is_nan() {
        assert!(time_to_seconds("").is_nan());
        assert!(time_to_seconds("00:00").is_nan());
        assert!(time_to_seconds("aa:00:01,000").is_nan());
        assert!(time_to_seconds("00:00:xx,000").is_nan());
        assert!(time_to_seconds("-1:00:00,000").is_nan());
    }

    // -------------------------------------------------------------------------
    // Formatting
    // -------------------------------------------------------------------------

    #[test]
    fn test_seconds_to_time() {
        assert_eq!(seconds_to_time(0.0), "00:00:00,000");
        assert_eq!(seconds_to_time(1.5), "00:00:01,500");
        assert_eq!(seconds_to_time(90.0), "00:01:30,000");
        assert_eq!(seconds_to_time(5400.0), "01:30:00,000");
        assert_eq!(seconds_to_time(59.9996), "00:01:00,000");
    }

    #[test]
    fn test_seconds_to_time_degenerate_input() {
        assert_eq!(seconds_to_time(-3.0), ZERO_TIMESTAMP);
        assert_eq!(seconds_to_time(f64::NAN), ZERO_TIMESTAMP);
        assert_eq!(seconds_to_time(f64::INFINITY), ZERO_TIMESTAMP);
    }

    #[test]
    fn test_roundtrip_within_a_millisecond() {
        let mut x = 0.0;
        while x < 40_000.0 {
            let back = time_to_seconds(&seconds_to_time(x));
            assert!((back - x).abs() <= 0.0005 + 1e-9, "x={x} back={back}");
            x += 123.4567;
        }
    }

    // -------------------------------------------------------------------------
    // Validation and dialects
    // -------------------------------------------------------------------------

    #[test]
    fn test_is_valid_time() {
        assert!(is_valid_time("00:00:01,000"));
        assert!(!is_valid_time("00:00:01.000"));
        assert!(!is_valid_time("0:00:01,000"));
        assert!(!is_valid_time("00:00:01,000 "));
        assert!(!is_valid_time("00:01,000"));
    }

    #[test]
    fn test_vtt_to_canonical() {
        assert_eq!(vtt_to_canonical("01:23.456").as_deref(), Some("00:01:23,456"));
        assert_eq!(vtt_to_canonical("02:01:23.456").as_deref(), Some("02:01:23,456"));
        assert_eq!(vtt_to_canonical("00:00:01,000"), None);
        assert_eq!(vtt_to_canonical("garbage"), None);
    }

    #[test]
    fn test_canonical_to_vtt() {
        assert_eq!(canonical_to_vtt("00:00:01,500"), "00:00:01.500");
    }
}

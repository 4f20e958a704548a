//! End-to-End Editing Scenarios
//!
//! Exercises the engine the way the editor drives it: load a document,
//! edit through the session, walk the history, persist, export.

use std::borrow::Cow;

use crate::core::captions::{parse_document, parse_srt, parse_vtt, Dialect, ExportFormat};
use crate::core::commands::EditCommand;
use crate::core::project::{snapshot, Session};
use crate::core::settings::EditorSettings;
use crate::core::timeline::{
    bulk_shift, locate, merge_cues, sort_chronologically, split_cue, ShiftMode,
};

const THREE_CUES: &str = "\
1
00:00:00,000 --> 00:00:02,000
Hello world

2
00:00:03,000 --> 00:00:05,000
Second

3
00:00:06,000 --> 00:00:08,000
Third
";

const PROLOGUE_VTT: &str = "\
WEBVTT - Demo
Kind: captions

NOTE translated by hand

STYLE
::cue { color: yellow }

intro
00:00.500 --> 00:02.000 align:start
<i>Welcome</i>

00:03.000 --> 00:04.500
Goodbye, friends
";

/// (cue count, texts) of the active track
fn state(session: &Session) -> (usize, Vec<String>) {
    let cues = session.active_cues();
    (cues.len(), cues.iter().map(|c| c.text.clone()).collect())
}

fn uuid_at(session: &Session, index: usize) -> String {
    session.active_cues()[index].uuid.clone()
}

// -----------------------------------------------------------------------------
// History
// -----------------------------------------------------------------------------

#[test]
fn test_split_merge_add_fully_undoable_and_redoable() {
    let mut session = Session::default();
    session.load_document("English", THREE_CUES, Dialect::Srt).unwrap();

    let mut states = vec![state(&session)];

    let first = uuid_at(&session, 0);
    session
        .execute(&EditCommand::SplitCue {
            cue_id: first.clone(),
            caret_position: 5,
            text_length: 11,
        })
        .unwrap();
    states.push(state(&session));
    assert_eq!(states[1].1[..2], ["Hello".to_string(), " world".to_string()]);

    let second_half = uuid_at(&session, 1);
    session
        .execute(&EditCommand::MergeCues {
            first_id: first.clone(),
            second_id: second_half,
        })
        .unwrap();
    states.push(state(&session));
    assert_eq!(states[2], states[0]);

    let (before, after) = (uuid_at(&session, 1), uuid_at(&session, 2));
    session
        .execute(&EditCommand::AddCue {
            before_id: before,
            after_id: Some(after),
            text: "Inserted".into(),
        })
        .unwrap();
    states.push(state(&session));
    assert_eq!(states[3].0, 4);
    assert_eq!(session.active_cues()[2].start_time, "00:00:05,000");
    assert_eq!(session.active_cues()[2].end_time, "00:00:06,000");

    for expected in states.iter().rev().skip(1) {
        session.undo().unwrap();
        assert_eq!(&state(&session), expected);
    }
    assert!(!session.can_undo());

    for expected in states.iter().skip(1) {
        session.redo().unwrap();
        assert_eq!(&state(&session), expected);
    }
    assert!(!session.can_redo());

    // Sequence numbers stay dense through every step.
    let ids: Vec<u32> = session.active_cues().iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[test]
fn test_track_switch_preserves_independent_undo_positions() {
    let mut session = Session::default();
    let a = session.load_document("A", THREE_CUES, Dialect::Srt).unwrap();
    let b = session.load_document("B", THREE_CUES, Dialect::Srt).unwrap();

    // Track B: one edit, then undone.
    let b_first = uuid_at(&session, 0);
    session
        .execute(&EditCommand::UpdateText {
            cue_id: b_first,
            text: "B edit".into(),
        })
        .unwrap();
    session.undo().unwrap();
    assert!(session.can_redo());

    // Track A: two edits.
    session.set_active_track(&a).unwrap();
    assert!(!session.can_undo());
    let a_first = uuid_at(&session, 0);
    for text in ["A1", "A2"] {
        session
            .execute(&EditCommand::UpdateText {
                cue_id: a_first.clone(),
                text: text.into(),
            })
            .unwrap();
    }

    // Back to B: its redo is still there, untouched by A's edits.
    session.set_active_track(&b).unwrap();
    assert!(!session.can_undo());
    assert!(session.can_redo());
    assert_eq!(session.active_cues()[0].text, "Hello world");
    session.redo().unwrap();
    assert_eq!(session.active_cues()[0].text, "B edit");

    // And A kept both undo steps.
    session.set_active_track(&a).unwrap();
    assert_eq!(session.active_cues()[0].text, "A2");
    session.undo().unwrap();
    session.undo().unwrap();
    assert_eq!(session.active_cues()[0].text, "Hello world");
    assert!(!session.can_undo());

    assert_eq!(session.track(&b).unwrap().subtitles[0].text, "B edit");
}

#[test]
fn test_identical_tracks_keep_separate_histories() {
    let mut session = Session::default();
    let a = session.start_from_scratch("A").unwrap();
    let b = session.start_from_scratch("B").unwrap();

    session.set_active_track(&a).unwrap();
    let cue = uuid_at(&session, 0);
    session
        .execute(&EditCommand::UpdateText {
            cue_id: cue,
            text: "only A".into(),
        })
        .unwrap();

    session.set_active_track(&b).unwrap();
    assert!(!session.can_undo());
    assert_eq!(session.active_cues()[0].text, "");
}

// -----------------------------------------------------------------------------
// Cue algebra properties
// -----------------------------------------------------------------------------

#[test]
fn test_split_then_merge_restores_cue() {
    let cues = parse_srt(THREE_CUES);
    let original = &cues[1];

    let split = split_cue(&cues, &original.uuid, 3, original.text_len());
    assert_eq!(split.len(), 4);
    let merged = merge_cues(&split, &split[1].uuid, &split[2].uuid);

    assert_eq!(merged.len(), 3);
    assert_eq!(merged[1].start_time, original.start_time);
    assert_eq!(merged[1].end_time, original.end_time);
    assert_eq!(merged[1].text, original.text);
    assert_eq!(merged[1].uuid, original.uuid);
}

#[test]
fn test_bulk_shift_then_sort_through_session() {
    let mut session = Session::default();
    session.load_document("English", THREE_CUES, Dialect::Srt).unwrap();
    let third = uuid_at(&session, 2);

    // Moving the last cue to the front leaves the list out of order.
    session
        .execute(&EditCommand::UpdateTiming {
            cue_id: third.clone(),
            start_time: "00:00:00,000".into(),
            end_time: "00:00:00,500".into(),
        })
        .unwrap();
    assert!(matches!(sort_chronologically(session.active_cues()), Cow::Owned(_)));

    let result = session.execute(&EditCommand::SortChronologically).unwrap();
    assert!(result.committed);
    assert_eq!(session.active_cues()[0].uuid, third);
    // Sorting keeps sequence numbers with their cues.
    assert_eq!(session.active_cues()[0].id, 3);
    assert!(matches!(sort_chronologically(session.active_cues()), Cow::Borrowed(_)));

    let again = session.execute(&EditCommand::SortChronologically).unwrap();
    assert!(!again.committed);
}

#[test]
fn test_bulk_shift_large_list() {
    let content: String = (0..600)
        .map(|i| {
            let start = i as f64 * 2.0;
            format!(
                "{}\n{} --> {}\nLine {}\n\n",
                i + 1,
                crate::core::captions::seconds_to_time(start),
                crate::core::captions::seconds_to_time(start + 1.5),
                i
            )
        })
        .collect();
    let cues = parse_srt(&content);
    assert_eq!(cues.len(), 600);

    let targets: Vec<&str> = cues.iter().map(|c| c.uuid.as_str()).collect();
    let shifted = bulk_shift(&cues, &targets, 10.0, ShiftMode::Both);
    assert_eq!(shifted[0].start_time, "00:00:10,000");
    assert_eq!(shifted[599].end_time, "00:20:09,500");
}

// -----------------------------------------------------------------------------
// Playback lookup
// -----------------------------------------------------------------------------

#[test]
fn test_playback_sweep_with_hints() {
    let mut session = Session::default();
    session.load_document("English", THREE_CUES, Dialect::Srt).unwrap();
    let index = session.timing_index();

    let mut hint = None;
    let mut seen = Vec::new();
    for step in 0..90 {
        let time = step as f64 * 0.1;
        let found = locate(&index, time, hint);
        let expected = index.iter().position(|t| t.start <= time && time < t.end);
        assert_eq!(found, expected, "time {time}");
        if let Some(i) = found {
            if seen.last() != Some(&i) {
                seen.push(i);
            }
        }
        hint = found.or(hint);
    }
    assert_eq!(seen, vec![0, 1, 2]);
}

#[test]
fn test_timing_index_refreshes_after_edit() {
    let mut session = Session::default();
    session.load_document("English", THREE_CUES, Dialect::Srt).unwrap();
    let second = uuid_at(&session, 1);

    session
        .execute(&EditCommand::BulkShift {
            cue_ids: vec![second.clone()],
            offset_sec: 0.5,
            mode: ShiftMode::Both,
        })
        .unwrap();

    let index = session.timing_index();
    assert_eq!(locate(&index, 3.2, None), None);
    assert_eq!(locate(&index, 3.6, None).map(|i| index[i].uuid.clone()), Some(second));
}

// -----------------------------------------------------------------------------
// Formats and persistence
// -----------------------------------------------------------------------------

#[test]
fn test_vtt_prologue_survives_edit_and_export() {
    let mut session = Session::default();
    let id = session.load_document("Demo", PROLOGUE_VTT, Dialect::Vtt).unwrap();
    assert_eq!(session.active_cues().len(), 2);
    assert_eq!(session.active_cues()[0].start_time, "00:00:00,500");

    let second = uuid_at(&session, 1);
    session
        .execute(&EditCommand::UpdateText {
            cue_id: second,
            text: "Farewell".into(),
        })
        .unwrap();

    let exported = session.export_track(&id, ExportFormat::Vtt).unwrap();
    let prologue =
        "WEBVTT - Demo\nKind: captions\n\nNOTE translated by hand\n\nSTYLE\n::cue { color: yellow }\n\n";
    assert!(exported.starts_with(prologue));
    assert!(exported.contains("00:00:00.500 --> 00:00:02.000\n<i>Welcome</i>\n"));

    let reparsed = parse_document(&exported, Dialect::Vtt);
    assert_eq!(reparsed.metadata, session.track(&id).unwrap().metadata());
    assert_eq!(reparsed.cues[1].text, "Farewell");

    let cues = parse_vtt(&exported);
    assert_eq!(cues.len(), 2);
}

#[test]
fn test_derived_exports() {
    let mut session = Session::default();
    let id = session.load_document("Demo", PROLOGUE_VTT, Dialect::Vtt).unwrap();

    let text = session.export_track(&id, ExportFormat::PlainText).unwrap();
    assert_eq!(text, "<i>Welcome</i>\nGoodbye, friends\n");

    let csv = session.export_track(&id, ExportFormat::Csv).unwrap();
    assert_eq!(
        csv,
        "Index,Start,End,Text\n\
         1,\"00:00:00,500\",\"00:00:02,000\",<i>Welcome</i>\n\
         2,\"00:00:03,000\",\"00:00:04,500\",\"Goodbye, friends\"\n"
    );

    let srt = session.export_track(&id, ExportFormat::Srt).unwrap();
    let reparsed = parse_srt(&srt);
    assert_eq!(reparsed.len(), 2);
    assert_eq!(reparsed[1].end_time, "00:00:04,500");
}

#[test]
fn test_snapshot_roundtrip_then_keep_editing() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("session.json");

    let mut session = Session::default();
    let vtt = session.load_document("Demo", PROLOGUE_VTT, Dialect::Vtt).unwrap();
    session.load_document("English", THREE_CUES, Dialect::Srt).unwrap();
    let first = uuid_at(&session, 0);
    session.execute(&EditCommand::DeleteCue { cue_id: first }).unwrap();
    session.set_active_track(&vtt).unwrap();
    snapshot::save(&path, &session).unwrap();

    let mut restored = snapshot::load(&path, EditorSettings::default())
        .unwrap()
        .unwrap();
    assert_eq!(restored.tracks().len(), 2);
    assert_eq!(restored.active_track_id(), Some(vtt.as_str()));
    assert_eq!(restored.tracks()[1].subtitles.len(), 2);
    assert_eq!(
        restored.track(&vtt).unwrap().metadata(),
        session.track(&vtt).unwrap().metadata()
    );

    // History starts fresh after a reload.
    assert!(!restored.can_undo());
    let cue = uuid_at(&restored, 0);
    restored
        .execute(&EditCommand::UpdateText {
            cue_id: cue,
            text: "Edited".into(),
        })
        .unwrap();
    restored.undo().unwrap();
    assert_eq!(restored.active_cues()[0].text, "<i>Welcome</i>");
}

#[test]
fn test_dialect_sniffing_feeds_parser() {
    let dialect = Dialect::resolve(None, PROLOGUE_VTT);
    assert_eq!(dialect, Dialect::Vtt);
    assert_eq!(parse_document(PROLOGUE_VTT, dialect).cues.len(), 2);

    let dialect = Dialect::resolve(Some("episode.srt"), THREE_CUES);
    assert_eq!(dialect, Dialect::Srt);
    assert_eq!(parse_document(THREE_CUES, dialect).cues.len(), 3);
}

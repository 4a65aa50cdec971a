//! Integration tests for the chart editor core
//!
//! Drive a full session: draw notes, change the view, save, reopen and play.

use slidechart::playback::VirtualClip;
use slidechart::{
    decode_chart, frequency_ratio, read_chart_file, write_chart_file, AudioRig, ChartError,
    ChartFile, EditorConfig, PersistedNoteRecord, Point2, Session, SnapSettings,
};

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

#[test]
fn test_save_and_reopen_preserves_data_space() {
    let mut session = Session::default();
    session.begin_note(Point2::new(2.0, 1.0));
    session.drag_note(Point2::new(12.0, -2.0));
    session.end_note().unwrap();

    // Save while zoomed in; the file must not depend on zoom
    session.set_scroll_speed(3.0).unwrap();
    let bytes = session.save().unwrap();

    let saved = decode_chart(&bytes).unwrap();
    assert_eq!(saved.note_spacing, 140);
    assert_eq!(saved.notes.len(), 1);
    let record = saved.notes[0];
    assert!(close(record.0[0], 0.4));
    assert!(close(record.0[1], 2.0));
    assert_eq!(record.0[2], record.0[4]);

    let mut reopened = Session::default();
    reopened.load(&bytes).unwrap();
    assert_eq!(reopened.view().note_spacing, 5);
    let note = reopened.notes().get(0).unwrap();
    assert!(close(note.start().x, 2.0));
    assert!(close(note.end().x, 12.0));
    assert!(close(note.start().y, 1.0));
    assert!(close(note.end().y, -2.0));
}

#[test]
fn test_header_passes_through_save() {
    let chart = ChartFile {
        tempo: 95.0,
        time_signature: 3,
        endpoint: 64.0,
        note_color_start: [0.0, 1.0, 0.0],
        note_color_end: [1.0, 1.0, 0.0],
        ..ChartFile::default()
    };
    let mut session = Session::default();
    session.open_chart(chart).unwrap();
    assert_eq!(session.grid().spacing(), 15.0);

    let saved = decode_chart(&session.save().unwrap()).unwrap();
    assert_eq!(saved.tempo, 95.0);
    assert_eq!(saved.time_signature, 3);
    assert_eq!(saved.endpoint, 64.0);
    assert_eq!(saved.note_color_start, [0.0, 1.0, 0.0]);
    assert_eq!(saved.note_color_end, [1.0, 1.0, 0.0]);
}

#[test]
fn test_snapped_drawing() {
    let config = EditorConfig {
        snap: SnapSettings {
            snap_to_rhythm: true,
            snap_to_chroma: true,
            ..SnapSettings::default()
        },
        ..EditorConfig::default()
    };
    let mut session = Session::new(config);
    session.begin_note(Point2::new(4.6, 0.1));
    session.drag_note(Point2::new(11.0, 1.2));
    session.end_note().unwrap();

    let note = session.notes().get(0).unwrap();
    assert_eq!(note.start().x, 5.0);
    assert_eq!(note.end().x, 10.0);
    assert_eq!(note.start().y, 0.0);
    // 1.2 is 3.2 semitones above center; snapped to 3
    assert!(close(note.end().y, 1.125));
}

#[test]
fn test_playback_sweeps_through_note() {
    let music = VirtualClip::new();
    let voice = VirtualClip::muted();
    let audio = AudioRig::new()
        .with_music(music.clone())
        .with_voice(voice.clone());
    let mut session = Session::default().with_audio(audio);

    // Rising octave from track x 0 to 20
    session.begin_note(Point2::new(0.0, 0.0));
    session.drag_note(Point2::new(20.0, 4.5));
    session.end_note().unwrap();

    assert!(session.toggle_playback());
    let mut pitches = Vec::new();
    for _ in 0..30 {
        let frame = session.tick(0.1).unwrap();
        if let Some(active) = frame.active {
            pitches.push(active.pitch);
        }
    }

    // Playhead crosses the note between offsets -8 and -28
    assert!(!pitches.is_empty());
    assert!(pitches.windows(2).all(|w| w[1] >= w[0]));
    assert!(pitches.iter().all(|&p| p >= frequency_ratio(0.0) && p <= frequency_ratio(12.0)));
    assert!(music.snapshot().playing);
    assert_eq!(voice.snapshot().volume, 0.0);

    assert!(!session.toggle_playback());
    assert!(!music.snapshot().playing);
    assert!(close(session.track_offset(), -30.0));
}

#[test]
fn test_editing_is_locked_during_playback() {
    let mut session = Session::default();
    session.begin_note(Point2::new(0.0, 0.0));
    session.drag_note(Point2::new(5.0, 0.0));
    session.end_note().unwrap();

    session.start_playback();
    assert!(!session.begin_note(Point2::new(1.0, 1.0)));
    assert!(session.grab_node(Point2::new(0.0, 0.0)).is_none());
    assert!(!session.scroll(1.0));
    assert!(!session.seek(-40.0));

    session.stop_playback();
    let node = session.grab_node(Point2::new(0.0, 0.0));
    assert!(node.is_some());
    session.release_node();
    assert!(session.delete_selected().is_some());
    assert!(session.notes().is_empty());
}

#[test]
fn test_file_round_trip_on_disk() {
    let dir = std::env::temp_dir().join(format!("slidechart-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("chart.slch");

    let mut chart = ChartFile::default();
    chart.notes.push(PersistedNoteRecord([0.0, 4.0, -66.0, 132.0, -66.0]));
    chart.lyric_texts.push("ah".to_string());
    chart.lyric_positions.push(vec![1.0, 2.0]);

    write_chart_file(&path, &chart).unwrap();
    let read = read_chart_file(&path).unwrap();
    assert_eq!(read, chart);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_truncated_file_is_format_error() {
    let mut chart = ChartFile::default();
    chart.notes.push(PersistedNoteRecord([0.0, 4.0, 0.0, 0.0, 0.0]));
    let bytes = slidechart::encode_chart(&chart).unwrap();

    let mut session = Session::default();
    let result = session.load(&bytes[..bytes.len() - 3]);
    assert!(matches!(result, Err(ChartError::Format(_))));
    assert!(session.notes().is_empty());
}
